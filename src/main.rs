//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão = info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    let max_upload_bytes = app_state.config.max_upload_bytes;

    // Todas exigem o TenantContext (JWT) no próprio handler.
    let import_routes = Router::new()
        .route("/workbook", post(handlers::import::import_workbook))
        .route("/opening-stock", post(handlers::import::import_opening_stock))
        .route("/customer-balances", post(handlers::import::import_customer_balances))
        .route("/template", get(handlers::import::download_template));

    let container_routes = Router::new()
        .route("/{container_id}/items/upload", post(handlers::import::upload_container_items));

    Router::new()
        .route("/api/health", get(handlers::import::health))
        .nest("/api/import", import_routes)
        .nest("/api/containers", container_routes)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
