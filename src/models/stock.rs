// src/models/stock.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- CONTAINER (Lote de estoque) ---
// Containers "sintéticos" de estoque inicial têm is_opening_stock = true
// e são identificados pelo rótulo de agrupamento (container_no).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    #[schema(example = "openingstock")]
    pub container_no: String,
    pub is_opening_stock: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainerItem {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub container_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub item_name: String,
    pub received_qty: Decimal,
    pub sold_qty: Decimal,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContainerItem {
    pub supplier_id: Option<Uuid>,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}
