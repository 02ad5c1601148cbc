// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// `payment_type` reservado para o saldo inicial (lado crédito).
pub const OPENING_BALANCE_PAYMENT_TYPE: &str = "opening_balance";

/// Texto de nota que marca lançamentos de saldo inicial vindos da importação.
pub const OPENING_BALANCE_NOTE: &str = "Opening balance from import";

/// Descrição da linha única da venda sintética (lado débito).
pub const OPENING_BALANCE_SALE_ITEM: &str = "Opening Balance - Customer Owes";

// --- VENDA (lado débito) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "1500.00")]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub sale_id: Uuid,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

// --- PAGAMENTO DO CLIENTE (lado crédito) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayment {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "750.25")]
    pub amount: Decimal,
    #[schema(example = "opening_balance")]
    pub payment_type: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
