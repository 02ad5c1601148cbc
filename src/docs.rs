// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Import ---
        handlers::import::import_workbook,
        handlers::import::import_opening_stock,
        handlers::import::import_customer_balances,
        handlers::import::upload_container_items,
        handlers::import::download_template,

        // --- Health ---
        handlers::import::health,
    ),
    components(
        schemas(
            // --- Relatórios ---
            models::import::ImportReport,
            models::import::CategoryReport,
            models::import::OpeningStockReport,

            // --- Entidades criadas pela importação ---
            models::crm::Customer,
            models::supplier::Supplier,
            models::supplier::SupplierItem,
            models::stock::Container,
            models::stock::ContainerItem,
            models::finance::Sale,
            models::finance::SaleItem,
            models::finance::CustomerPayment,
        )
    ),
    tags(
        (name = "Import", description = "Importação de Planilhas (clientes, fornecedores, itens, saldos e estoque)"),
        (name = "Health", description = "Verificação de Saúde do Serviço")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
