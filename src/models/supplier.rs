// src/models/supplier.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Chave natural: (company_id, name)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    #[schema(example = "Acme Trading")]
    pub name: String,
    pub contact: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Item do catálogo (tabela de preços) de um fornecedor.
// O nome só é único DENTRO do fornecedor: (supplier_id, item_name)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierItem {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub supplier_id: Uuid,
    #[schema(example = "Rice 25kg")]
    pub item_name: String,
    #[schema(example = "42.50")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplier {
    pub name: String,
    pub contact: Option<String>,
    pub country: Option<String>,
}
