// src/services/import/memory_store.rs
//
// Implementação em memória da porta de importação, usada só nos testes.
// Respeita o escopo por tenant e as chaves naturais como o Postgres faria.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::store::{ImportStore, OpeningStockPosting};
use crate::{
    common::error::AppError,
    models::{
        crm::Customer,
        finance::{CustomerPayment, Sale, SaleItem, OPENING_BALANCE_NOTE, OPENING_BALANCE_PAYMENT_TYPE, OPENING_BALANCE_SALE_ITEM},
        stock::{Container, ContainerItem, NewContainerItem},
        supplier::{NewSupplier, Supplier, SupplierItem},
    },
};

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    suppliers: Vec<Supplier>,
    supplier_items: Vec<SupplierItem>,
    containers: Vec<Container>,
    container_items: Vec<ContainerItem>,
    sales: Vec<Sale>,
    sale_items: Vec<SaleItem>,
    payments: Vec<CustomerPayment>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing_name: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualquer operação que receba este nome (cliente, fornecedor, item ou rótulo) falha.
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing_name = Some(name.to_string());
        self
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn check(&self, name: &str) -> Result<(), AppError> {
        match &self.failing_name {
            Some(failing) if failing == name => {
                Err(anyhow::anyhow!("simulated store failure for '{name}'").into())
            }
            _ => Ok(()),
        }
    }

    pub fn customers(&self, company_id: Uuid) -> Vec<Customer> {
        self.tables().customers.iter().filter(|c| c.company_id == company_id).cloned().collect()
    }

    pub fn suppliers(&self, company_id: Uuid) -> Vec<Supplier> {
        self.tables().suppliers.iter().filter(|s| s.company_id == company_id).cloned().collect()
    }

    pub fn supplier_items(&self, company_id: Uuid) -> Vec<SupplierItem> {
        self.tables().supplier_items.iter().filter(|i| i.company_id == company_id).cloned().collect()
    }

    pub fn containers(&self, company_id: Uuid) -> Vec<Container> {
        self.tables().containers.iter().filter(|c| c.company_id == company_id).cloned().collect()
    }

    pub fn container_items(&self, company_id: Uuid) -> Vec<ContainerItem> {
        self.tables().container_items.iter().filter(|i| i.company_id == company_id).cloned().collect()
    }

    pub fn sales(&self, company_id: Uuid) -> Vec<Sale> {
        self.tables().sales.iter().filter(|s| s.company_id == company_id).cloned().collect()
    }

    pub fn sale_items(&self, sale_id: Uuid) -> Vec<SaleItem> {
        self.tables().sale_items.iter().filter(|i| i.sale_id == sale_id).cloned().collect()
    }

    pub fn payments(&self, company_id: Uuid) -> Vec<CustomerPayment> {
        self.tables().payments.iter().filter(|p| p.company_id == company_id).cloned().collect()
    }

    /// Cria um container comum (não sintético) para os testes de upload.
    pub fn seed_container(&self, company_id: Uuid, container_no: &str) -> Container {
        let container = Container {
            id: Uuid::new_v4(),
            company_id,
            container_no: container_no.to_string(),
            is_opening_stock: false,
            created_at: Utc::now(),
        };
        self.tables().containers.push(container.clone());
        container
    }

    fn new_container_item(company_id: Uuid, container_id: Uuid, item: &NewContainerItem) -> ContainerItem {
        ContainerItem {
            id: Uuid::new_v4(),
            company_id,
            container_id,
            supplier_id: item.supplier_id,
            item_name: item.item_name.clone(),
            received_qty: item.quantity,
            sold_qty: Decimal::ZERO,
            unit_price: item.unit_price,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ImportStore for MemoryStore {
    async fn find_customer(&self, company_id: Uuid, name: &str) -> Result<Option<Customer>, AppError> {
        self.check(name)?;
        Ok(self
            .tables()
            .customers
            .iter()
            .find(|c| c.company_id == company_id && c.name == name)
            .cloned())
    }

    async fn insert_customer(
        &self,
        company_id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Option<Customer>, AppError> {
        self.check(name)?;
        let mut tables = self.tables();
        if tables.customers.iter().any(|c| c.company_id == company_id && c.name == name) {
            return Ok(None);
        }
        let customer = Customer {
            id: Uuid::new_v4(),
            company_id,
            name: name.to_string(),
            phone: phone.map(str::to_string),
            created_at: Utc::now(),
        };
        tables.customers.push(customer.clone());
        Ok(Some(customer))
    }

    async fn find_supplier(&self, company_id: Uuid, name: &str) -> Result<Option<Supplier>, AppError> {
        self.check(name)?;
        Ok(self
            .tables()
            .suppliers
            .iter()
            .find(|s| s.company_id == company_id && s.name == name)
            .cloned())
    }

    async fn insert_supplier(
        &self,
        company_id: Uuid,
        supplier: &NewSupplier,
    ) -> Result<Option<Supplier>, AppError> {
        self.check(&supplier.name)?;
        let mut tables = self.tables();
        if tables.suppliers.iter().any(|s| s.company_id == company_id && s.name == supplier.name) {
            return Ok(None);
        }
        let created = Supplier {
            id: Uuid::new_v4(),
            company_id,
            name: supplier.name.clone(),
            contact: supplier.contact.clone(),
            country: supplier.country.clone(),
            created_at: Utc::now(),
        };
        tables.suppliers.push(created.clone());
        Ok(Some(created))
    }

    async fn find_supplier_item(
        &self,
        supplier_id: Uuid,
        item_name: &str,
    ) -> Result<Option<SupplierItem>, AppError> {
        self.check(item_name)?;
        Ok(self
            .tables()
            .supplier_items
            .iter()
            .find(|i| i.supplier_id == supplier_id && i.item_name == item_name)
            .cloned())
    }

    async fn insert_supplier_item(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        item_name: &str,
        price: Decimal,
    ) -> Result<Option<SupplierItem>, AppError> {
        self.check(item_name)?;
        let mut tables = self.tables();
        if tables
            .supplier_items
            .iter()
            .any(|i| i.supplier_id == supplier_id && i.item_name == item_name)
        {
            return Ok(None);
        }
        let item = SupplierItem {
            id: Uuid::new_v4(),
            company_id,
            supplier_id,
            item_name: item_name.to_string(),
            price,
            created_at: Utc::now(),
        };
        tables.supplier_items.push(item.clone());
        Ok(Some(item))
    }

    async fn has_opening_balance(&self, company_id: Uuid, customer_id: Uuid) -> Result<bool, AppError> {
        let tables = self.tables();
        let marked = |notes: &Option<String>| {
            notes.as_deref().is_some_and(|n| n.contains(OPENING_BALANCE_NOTE))
        };

        let in_payments = tables.payments.iter().any(|p| {
            p.company_id == company_id
                && p.customer_id == customer_id
                && (p.payment_type == OPENING_BALANCE_PAYMENT_TYPE || marked(&p.notes))
        });
        let in_sales = tables
            .sales
            .iter()
            .any(|s| s.company_id == company_id && s.customer_id == customer_id && marked(&s.notes));

        Ok(in_payments || in_sales)
    }

    async fn post_opening_debit(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        amount: Decimal,
        notes: &str,
    ) -> Result<Sale, AppError> {
        let mut tables = self.tables();
        let sale = Sale {
            id: Uuid::new_v4(),
            company_id,
            customer_id,
            total_amount: amount,
            notes: Some(notes.to_string()),
            created_at: Utc::now(),
        };
        tables.sale_items.push(SaleItem {
            id: Uuid::new_v4(),
            company_id,
            sale_id: sale.id,
            item_name: OPENING_BALANCE_SALE_ITEM.to_string(),
            quantity: Decimal::ONE,
            unit_price: amount,
            created_at: Utc::now(),
        });
        tables.sales.push(sale.clone());
        Ok(sale)
    }

    async fn post_opening_credit(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        amount: Decimal,
        notes: &str,
    ) -> Result<CustomerPayment, AppError> {
        let payment = CustomerPayment {
            id: Uuid::new_v4(),
            company_id,
            customer_id,
            amount,
            payment_type: OPENING_BALANCE_PAYMENT_TYPE.to_string(),
            notes: Some(notes.to_string()),
            created_at: Utc::now(),
        };
        self.tables().payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_container(&self, company_id: Uuid, container_id: Uuid) -> Result<Option<Container>, AppError> {
        Ok(self
            .tables()
            .containers
            .iter()
            .find(|c| c.company_id == company_id && c.id == container_id)
            .cloned())
    }

    async fn post_opening_stock(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        label: &str,
        item_name: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OpeningStockPosting, AppError> {
        // Falhas simuladas acontecem antes de qualquer escrita, como um rollback.
        self.check(item_name)?;
        self.check(label)?;

        let mut tables = self.tables();
        if tables
            .supplier_items
            .iter()
            .any(|i| i.supplier_id == supplier_id && i.item_name == item_name)
        {
            return Ok(OpeningStockPosting::SupplierItemExists);
        }
        tables.supplier_items.push(SupplierItem {
            id: Uuid::new_v4(),
            company_id,
            supplier_id,
            item_name: item_name.to_string(),
            price,
            created_at: Utc::now(),
        });

        let existing = tables
            .containers
            .iter()
            .find(|c| c.company_id == company_id && c.container_no == label)
            .map(|c| c.id);
        let container_id = match existing {
            Some(id) => id,
            None => {
                let container = Container {
                    id: Uuid::new_v4(),
                    company_id,
                    container_no: label.to_string(),
                    is_opening_stock: true,
                    created_at: Utc::now(),
                };
                tables.containers.push(container.clone());
                container.id
            }
        };

        if tables
            .container_items
            .iter()
            .any(|i| i.container_id == container_id && i.item_name == item_name)
        {
            return Ok(OpeningStockPosting::ItemInContainer);
        }

        let item = NewContainerItem {
            supplier_id: Some(supplier_id),
            item_name: item_name.to_string(),
            quantity,
            unit_price: price,
        };
        let created = Self::new_container_item(company_id, container_id, &item);
        tables.container_items.push(created.clone());
        Ok(OpeningStockPosting::Created(created))
    }

    async fn insert_container_items(
        &self,
        company_id: Uuid,
        container_id: Uuid,
        items: &[NewContainerItem],
    ) -> Result<u64, AppError> {
        for item in items {
            self.check(&item.item_name)?;
        }
        let mut tables = self.tables();
        for item in items {
            tables
                .container_items
                .push(Self::new_container_item(company_id, container_id, item));
        }
        Ok(items.len() as u64)
    }
}
