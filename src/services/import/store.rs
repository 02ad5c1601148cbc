// src/services/import/store.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        crm::Customer,
        finance::{CustomerPayment, Sale},
        stock::{Container, ContainerItem, NewContainerItem},
        supplier::{NewSupplier, Supplier, SupplierItem},
    },
};

/// Resultado da cadeia de estoque inicial.
#[derive(Debug, Clone)]
pub enum OpeningStockPosting {
    Created(ContainerItem),
    SupplierItemExists,
    ItemInContainer,
}

/// Porta de persistência do motor de importação.
///
/// Toda operação recebe o `company_id` (ou um id já escopado por ele) e nunca
/// cruza tenants. Os métodos `insert_*` devolvem `None` quando a chave natural
/// já estava ocupada no momento da escrita.
#[async_trait]
pub trait ImportStore: Send + Sync {
    async fn find_customer(&self, company_id: Uuid, name: &str) -> Result<Option<Customer>, AppError>;

    async fn insert_customer(
        &self,
        company_id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Option<Customer>, AppError>;

    async fn find_supplier(&self, company_id: Uuid, name: &str) -> Result<Option<Supplier>, AppError>;

    async fn insert_supplier(
        &self,
        company_id: Uuid,
        supplier: &NewSupplier,
    ) -> Result<Option<Supplier>, AppError>;

    async fn find_supplier_item(
        &self,
        supplier_id: Uuid,
        item_name: &str,
    ) -> Result<Option<SupplierItem>, AppError>;

    async fn insert_supplier_item(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        item_name: &str,
        price: Decimal,
    ) -> Result<Option<SupplierItem>, AppError>;

    async fn has_opening_balance(&self, company_id: Uuid, customer_id: Uuid) -> Result<bool, AppError>;

    /// Débito: venda sintética com uma linha (quantidade 1, preço = valor).
    async fn post_opening_debit(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        amount: Decimal,
        notes: &str,
    ) -> Result<Sale, AppError>;

    /// Crédito: pagamento do cliente com `payment_type = "opening_balance"`.
    async fn post_opening_credit(
        &self,
        company_id: Uuid,
        customer_id: Uuid,
        amount: Decimal,
        notes: &str,
    ) -> Result<CustomerPayment, AppError>;

    async fn find_container(&self, company_id: Uuid, container_id: Uuid) -> Result<Option<Container>, AppError>;

    /// Cadeia do estoque inicial: item do catálogo, container (busca ou cria
    /// pelo rótulo) e item do container. Atômica: se um passo falhar, nada
    /// fica gravado. No pulo por item já no container, o item do catálogo
    /// recém-criado é mantido.
    async fn post_opening_stock(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
        label: &str,
        item_name: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OpeningStockPosting, AppError>;

    async fn insert_container_items(
        &self,
        company_id: Uuid,
        container_id: Uuid,
        items: &[NewContainerItem],
    ) -> Result<u64, AppError>;
}
