// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Payload do JWT. O tenant vem no próprio token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,        // ID do usuário
    pub company_id: Uuid, // Tenant ativo
    pub exp: usize,
    pub iat: usize,
}
