// src/handlers/import.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::TenantContext,
    models::import::{ImportReport, OpeningStockReport},
    services::import::template::{generate_template, TEMPLATE_FILE_NAME},
};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// Planilha ilegível continua 400; qualquer outra falha do pipeline vira o
// relatório genérico com 500.
fn pipeline_failure(err: AppError) -> Response {
    match err {
        AppError::WorkbookParse(_) | AppError::ResourceNotFound(_) => {
            tracing::warn!("Importação recusada: {}", err);
            err.into_response()
        }
        other => {
            tracing::error!("🔥 Falha na importação: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ImportReport::failure("Import failed due to an unexpected error")),
            )
                .into_response()
        }
    }
}

// ---
// Handler: Importação completa (todas as folhas)
// ---
#[utoipa::path(
    post,
    path = "/api/import/workbook",
    tag = "Import",
    request_body(content = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    responses(
        (status = 200, description = "Importação concluída sem erros de linha", body = ImportReport),
        (status = 207, description = "Importação parcial: algumas linhas falharam", body = ImportReport),
        (status = 400, description = "Arquivo ilegível"),
        (status = 500, description = "Falha geral do pipeline", body = ImportReport)
    ),
    security(("api_jwt" = []))
)]
pub async fn import_workbook(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    body: Bytes,
) -> Response {
    tracing::info!(user_id = %tenant.user_id, bytes = body.len(), "📥 Importação de planilha recebida");

    match app_state.import_engine.import_workbook(tenant.company_id, &body).await {
        Ok(report) => (report.http_status(), Json(report)).into_response(),
        Err(err) => pipeline_failure(err),
    }
}

// ---
// Handler: Estoque inicial (folha única)
// ---
#[utoipa::path(
    post,
    path = "/api/import/opening-stock",
    tag = "Import",
    request_body(content = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    responses(
        (status = 200, description = "Estoque inicial importado", body = OpeningStockReport),
        (status = 207, description = "Algumas linhas falharam", body = OpeningStockReport),
        (status = 400, description = "Arquivo ilegível")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_opening_stock(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    body: Bytes,
) -> Response {
    match app_state.import_engine.import_opening_stock(tenant.company_id, &body).await {
        Ok(report) => (report.http_status(), Json(report)).into_response(),
        Err(err) => pipeline_failure(err),
    }
}

// ---
// Handler: Saldos iniciais simples (cliente + saldo)
// ---
#[utoipa::path(
    post,
    path = "/api/import/customer-balances",
    tag = "Import",
    request_body(content = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    responses(
        (status = 200, description = "Saldos importados", body = ImportReport),
        (status = 207, description = "Algumas linhas falharam", body = ImportReport),
        (status = 400, description = "Arquivo ilegível")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_customer_balances(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    body: Bytes,
) -> Response {
    match app_state.import_engine.import_customer_balances(tenant.company_id, &body).await {
        Ok(report) => (report.http_status(), Json(report)).into_response(),
        Err(err) => pipeline_failure(err),
    }
}

// ---
// Handler: Upload de itens para um container existente
// ---
#[utoipa::path(
    post,
    path = "/api/containers/{container_id}/items/upload",
    tag = "Import",
    request_body(content = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    responses(
        (status = 200, description = "Itens inseridos", body = OpeningStockReport),
        (status = 207, description = "Algumas linhas falharam", body = OpeningStockReport),
        (status = 400, description = "Arquivo ilegível"),
        (status = 404, description = "Container não encontrado")
    ),
    params(
        ("container_id" = Uuid, Path, description = "ID do Container")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_container_items(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(container_id): Path<Uuid>,
    body: Bytes,
) -> Response {
    match app_state
        .import_engine
        .upload_container_items(tenant.company_id, container_id, &body)
        .await
    {
        Ok(report) => (report.http_status(), Json(report)).into_response(),
        Err(err) => pipeline_failure(err),
    }
}

// ---
// Handler: Download do modelo de planilha
// ---
#[utoipa::path(
    get,
    path = "/api/import/template",
    tag = "Import",
    responses(
        (status = 200, description = "Modelo .xlsx", body = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_template(_tenant: TenantContext) -> Result<Response, AppError> {
    let bytes = generate_template()?;

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{TEMPLATE_FILE_NAME}\""),
        ),
    ];

    Ok((headers, bytes).into_response())
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Serviço e banco respondendo"),
        (status = 500, description = "Banco indisponível")
    )
)]
pub async fn health(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    sqlx::query("SELECT 1").execute(&app_state.db_pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
