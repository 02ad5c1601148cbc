// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Planilha ilegível ou corrompida. Não é reprocessada.
    #[error("Unable to read workbook: {0}")]
    WorkbookParse(String),

    #[error("Unable to build template: {0}")]
    Template(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid or missing authentication token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    // Qualquer outro erro inesperado. O `anyhow` guarda o contexto.
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::WorkbookParse(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match &self {
            AppError::WorkbookParse(_) | AppError::InvalidToken | AppError::ResourceNotFound(_) => self.to_string(),

            // Todo o resto vira 500. O detalhe vai para o log, não para o cliente.
            e => {
                tracing::error!("Internal server error: {}", e);
                "An unexpected error occurred.".to_string()
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}
