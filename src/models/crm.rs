// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- CLIENTE ---
// Chave natural: (company_id, name)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "+55 11 99999-0000")]
    pub phone: Option<String>,

    pub created_at: DateTime<Utc>,
}
