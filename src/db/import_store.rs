// src/db/import_store.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{stock_repo::container_item_batches, CustomerRepository, FinanceRepository, StockRepository, SupplierRepository},
    models::{
        crm::Customer,
        finance::{CustomerPayment, Sale, OPENING_BALANCE_PAYMENT_TYPE, OPENING_BALANCE_SALE_ITEM},
        stock::{Container, NewContainerItem},
        supplier::{NewSupplier, Supplier, SupplierItem},
    },
    services::import::{store::OpeningStockPosting, ImportStore},
};

// Implementação Postgres da porta de importação.
// Cada chamada é uma unidade independente. O débito (venda + linha), a cadeia de
// estoque inicial e o upload em lotes usam transação.
#[derive(Clone)]
pub struct PgImportStore {
    pool: PgPool,
    customers: CustomerRepository,
    suppliers: SupplierRepository,
    stock: StockRepository,
    finance: FinanceRepository,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            customers: CustomerRepository::new(),
            suppliers: SupplierRepository::new(),
            stock: StockRepository::new(),
            finance: FinanceRepository::new(),
        }
    }
}

#[async_trait]
impl ImportStore for PgImportStore {
    async fn find_customer(&self, company_id: Uuid, name: &str) -> Result<Option<Customer>, AppError> {
        self.customers.find_by_name(&self.pool, company_id, name).await
    }

    async fn insert_customer(
        &self,
        company_id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Option<Customer>, AppError> {
        self.customers.insert_if_absent(&self.pool, company_id, name, phone).await
    }

    async fn find_supplier(&self, company_id: Uuid, name: &str) -> Result<Option<Supplier>, AppError> {
        self.suppliers.find_by_name(&self.pool, company_id, name).await
    }

    async fn insert_supplier(
        &self,
        company_id: Uuid,
        supplier: &NewSupplier,
    ) -> Result<Option<Supplier>, AppError> {
        self.suppliers.insert_if_absent(&self.pool, company_id, supplier).await
    }

    async fn find_supplier_item(
        &self,
        supplier_id: Uuid,
        item_name: &str,
    ) -> Result<Option<SupplierItem>, AppError> {
        self.suppliers.find_item(&self.pool, supplier_id, item_name).await
    }

    async fn insert_supplier_item(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        item_name: &str,
        price: Decimal,
    ) -> Result<Option<SupplierItem>, AppError> {
        self.suppliers
            .insert_item_if_absent(&self.pool, company_id, supplier_id, item_name, price)
            .await
    }

    async fn has_opening_balance(&self, company_id: Uuid, customer_id: Uuid) -> Result<bool, AppError> {
        self.finance.has_opening_balance(&self.pool, company_id, customer_id).await
    }

    async fn post_opening_debit(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        amount: Decimal,
        notes: &str,
    ) -> Result<Sale, AppError> {
        // Venda e linha entram juntas ou não entram.
        let mut tx = self.pool.begin().await?;

        let sale = self
            .finance
            .create_sale(&mut *tx, company_id, customer_id, amount, notes)
            .await?;

        self.finance
            .create_sale_item(&mut *tx, company_id, sale.id, OPENING_BALANCE_SALE_ITEM, Decimal::ONE, amount)
            .await?;

        tx.commit().await?;
        Ok(sale)
    }

    async fn post_opening_credit(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        amount: Decimal,
        notes: &str,
    ) -> Result<CustomerPayment, AppError> {
        self.finance
            .create_payment(&self.pool, company_id, customer_id, amount, OPENING_BALANCE_PAYMENT_TYPE, notes)
            .await
    }

    async fn find_container(&self, company_id: Uuid, container_id: Uuid) -> Result<Option<Container>, AppError> {
        self.stock.find_container(&self.pool, company_id, container_id).await
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
        // Catálogo, container e item do container entram juntos ou não entram.
        let mut tx = self.pool.begin().await?;

        let inserted = self
            .suppliers
            .insert_item_if_absent(&mut *tx, company_id, supplier_id, item_name, price)
            .await?;
        if inserted.is_none() {
            return Ok(OpeningStockPosting::SupplierItemExists);
        }

        let container = match self.stock.find_container_by_label(&mut *tx, company_id, label).await? {
            Some(container) => container,
            None => match self.stock.insert_opening_container(&mut *tx, company_id, label).await? {
                Some(container) => container,
                // Outra importação criou o container entre a busca e o insert.
                None => self
                    .stock
                    .find_container_by_label(&mut *tx, company_id, label)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("container '{label}' vanished after conflict"))?,
            },
        };

        if self.stock.find_container_item(&mut *tx, container.id, item_name).await?.is_some() {
            tx.commit().await?;
            return Ok(OpeningStockPosting::ItemInContainer);
        }

        let item = NewContainerItem {
            supplier_id: Some(supplier_id),
            item_name: item_name.to_string(),
            quantity,
            unit_price: price,
        };
        let created = self
            .stock
            .insert_container_item(&mut *tx, company_id, container.id, &item)
            .await?;

        tx.commit().await?;
        Ok(OpeningStockPosting::Created(created))
    }

    async fn insert_container_items(
        &self,
        company_id: Uuid,
        container_id: Uuid,
        items: &[NewContainerItem],
    ) -> Result<u64, AppError> {
        // Lotes limitados pelo teto de parâmetros do Postgres, todos na mesma transação.
        let mut tx = self.pool.begin().await?;
        let mut added = 0;
        for batch in container_item_batches(items) {
            added += self
                .stock
                .insert_container_items(&mut *tx, company_id, container_id, batch)
                .await?;
        }
        tx.commit().await?;
        Ok(added)
    }
}
