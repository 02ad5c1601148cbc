// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState};

// Contexto autenticado: quem chama e em qual empresa (tenant) atua.
// Todo handler de importação recebe isto; o company_id nunca vem do corpo.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub company_id: Uuid,
}

impl<S> FromRequestParts<S> for TenantContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::InvalidToken)?;

        let app_state = AppState::from_ref(state);
        let claims = app_state.auth_service.validate_token(bearer.token())?;

        Ok(TenantContext {
            user_id: claims.sub,
            company_id: claims.company_id,
        })
    }
}
