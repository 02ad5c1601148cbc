// src/services/import/pipeline.rs

use std::sync::Arc;

use uuid::Uuid;

use super::{
    normalizer::{normalize, normalize_container_item, normalize_customer_balance, normalize_opening_stock},
    reader::read_workbook,
    report::ReportBuilder,
    resolver::{EntityResolver, RowError},
    store::ImportStore,
    writer::ReconciliationWriter,
};
use crate::{
    common::error::AppError,
    models::{
        import::{
            CategoryReport, ImportReport, NormalizedRow, OpeningStockReport, RawRow, RowOutcome,
            SheetData, SheetKind, WorkbookData,
        },
        stock::NewContainerItem,
    },
};

/// Motor de importação. Barato de clonar: guarda só a porta de persistência.
#[derive(Clone)]
pub struct ImportEngine {
    store: Arc<dyn ImportStore>,
    opening_stock_label: String,
}

impl ImportEngine {
    pub fn new(store: Arc<dyn ImportStore>, opening_stock_label: impl Into<String>) -> Self {
        Self {
            store,
            opening_stock_label: opening_stock_label.into(),
        }
    }

    fn writer(&self, company_id: Uuid) -> ReconciliationWriter<'_> {
        ReconciliationWriter::new(
            EntityResolver::new(self.store.as_ref(), company_id),
            &self.opening_stock_label,
        )
    }

    // =========================================================================
    //  1. PASTA COMPLETA (todas as folhas, ordem fixa)
    // =========================================================================

    /// Lê o buffer e roda o pipeline. Só a leitura pode falhar como um todo.
    pub async fn import_workbook(&self, company_id: Uuid, bytes: &[u8]) -> Result<ImportReport, AppError> {
        let workbook = read_workbook(bytes)?;
        Ok(self.run(company_id, &workbook).await)
    }

    /// Processa as folhas reconhecidas em `SheetKind::IMPORT_ORDER`,
    /// independente da ordem física no arquivo.
    #[tracing::instrument(skip_all, fields(company_id = %company_id))]
    pub async fn run(&self, company_id: Uuid, workbook: &WorkbookData) -> ImportReport {
        let writer = self.writer(company_id);
        let mut report = ReportBuilder::new();

        for kind in SheetKind::IMPORT_ORDER {
            report.touch(kind.category());

            let Some(sheet) = workbook.sheet(kind) else {
                continue;
            };

            let category = process_sheet(&writer, kind, sheet).await;
            tracing::info!(
                sheet = %sheet.name,
                rows = sheet.rows.len(),
                created = category.created,
                skipped = category.skipped,
                errors = category.errors.len(),
                "Folha processada"
            );
            report.merge(kind.category(), category);
        }

        report.finish()
    }

    // =========================================================================
    //  2. ESTOQUE INICIAL (folha única)
    // =========================================================================

    #[tracing::instrument(skip_all, fields(company_id = %company_id))]
    pub async fn import_opening_stock(
        &self,
        company_id: Uuid,
        bytes: &[u8],
    ) -> Result<OpeningStockReport, AppError> {
        let workbook = read_workbook(bytes)?;
        let writer = self.writer(company_id);
        let mut report = OpeningStockReport::default();

        let Some(sheet) = workbook.sheet_or_first(SheetKind::OpeningStock) else {
            return Ok(report.finish());
        };

        for row in &sheet.rows {
            match normalize_opening_stock(row) {
                Err(rejection) => {
                    tracing::warn!(row = row.row_number, reason = %rejection.reason, "Linha rejeitada");
                    report.failed_items.push(rejection.reason);
                }
                Ok(record) => {
                    let outcome = writer
                        .write_opening_stock(&record)
                        .await
                        .unwrap_or_else(|err| row_failure(row, err));
                    report.record(&record.item_name, outcome);
                }
            }
        }

        let report = report.finish();
        tracing::info!("{}", report.message);
        Ok(report)
    }

    // =========================================================================
    //  3. SALDOS INICIAIS SIMPLES (cliente + saldo, folha única)
    // =========================================================================

    #[tracing::instrument(skip_all, fields(company_id = %company_id))]
    pub async fn import_customer_balances(
        &self,
        company_id: Uuid,
        bytes: &[u8],
    ) -> Result<ImportReport, AppError> {
        let workbook = read_workbook(bytes)?;
        let writer = self.writer(company_id);

        let mut customers = CategoryReport::default();
        let mut balances = CategoryReport::default();

        if let Some(sheet) = workbook.sheet_or_first(SheetKind::OpeningBalances) {
            for row in &sheet.rows {
                match normalize_customer_balance(row) {
                    Err(rejection) => {
                        tracing::warn!(row = row.row_number, reason = %rejection.reason, "Linha rejeitada");
                        balances.record(RowOutcome::Failed(rejection.reason));
                    }
                    Ok(record) => match writer.write_customer_balance(&record).await {
                        Ok((customer, balance)) => {
                            customers.record(customer);
                            balances.record(balance);
                        }
                        Err(err) => balances.record(row_failure(row, err)),
                    },
                }
            }
        }

        let mut report = ReportBuilder::new();
        report.merge(SheetKind::Customers.category(), customers);
        report.merge(SheetKind::OpeningBalances.category(), balances);
        Ok(report.finish())
    }

    // =========================================================================
    //  4. UPLOAD PARA CONTAINER EXISTENTE (inserção em massa, sem idempotência)
    // =========================================================================

    #[tracing::instrument(skip_all, fields(company_id = %company_id, container_id = %container_id))]
    pub async fn upload_container_items(
        &self,
        company_id: Uuid,
        container_id: Uuid,
        bytes: &[u8],
    ) -> Result<OpeningStockReport, AppError> {
        // Container de outro tenant é tratado como inexistente.
        self.store
            .find_container(company_id, container_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Container".to_string()))?;

        let workbook = read_workbook(bytes)?;
        let mut report = OpeningStockReport::default();
        let mut items = Vec::new();

        if let Some(sheet) = workbook.sheet_or_first(SheetKind::OpeningStock) {
            for row in &sheet.rows {
                match normalize_container_item(row) {
                    Ok(record) => items.push(NewContainerItem {
                        supplier_id: None,
                        item_name: record.item_name,
                        quantity: record.quantity,
                        unit_price: record.price,
                    }),
                    Err(rejection) => report.failed_items.push(rejection.reason),
                }
            }
        }

        let added = self
            .store
            .insert_container_items(company_id, container_id, &items)
            .await?;

        report.added_items = added as usize;
        report.message = format!(
            "Container upload finished: {} added, {} failed",
            report.added_items,
            report.failed_items.len()
        );
        tracing::info!("{}", report.message);
        Ok(report)
    }
}

async fn process_sheet(writer: &ReconciliationWriter<'_>, kind: SheetKind, sheet: &SheetData) -> CategoryReport {
    let mut report = CategoryReport::default();

    for row in &sheet.rows {
        let outcome = match normalize(kind, row) {
            Err(rejection) => {
                tracing::warn!(sheet = %sheet.name, row = row.row_number, reason = %rejection.reason, "Linha rejeitada");
                RowOutcome::Failed(rejection.reason)
            }
            Ok(record) => apply(writer, &record)
                .await
                .unwrap_or_else(|err| row_failure(row, err)),
        };
        report.record(outcome);
    }

    report
}

async fn apply(writer: &ReconciliationWriter<'_>, record: &NormalizedRow) -> Result<RowOutcome, RowError> {
    match record {
        NormalizedRow::Customer(r) => writer.write_customer(r).await,
        NormalizedRow::Supplier(r) => writer.write_supplier(r).await,
        NormalizedRow::SupplierItem(r) => writer.write_supplier_item(r).await,
        NormalizedRow::OpeningBalance(r) => writer.write_opening_balance(r).await,
        NormalizedRow::OpeningStock(r) => writer.write_opening_stock(r).await,
    }
}

/// Converte a falha de uma linha em texto de relatório. Nunca aborta o lote.
fn row_failure(row: &RawRow, err: RowError) -> RowOutcome {
    match err {
        RowError::NotFound { .. } => {
            tracing::warn!(row = row.row_number, "{}", err);
            RowOutcome::Failed(err.to_string())
        }
        RowError::Store(e) => {
            tracing::error!(row = row.row_number, "Falha ao gravar linha: {}", e);
            RowOutcome::Failed(format!("Error processing row {}: {}", row.to_json_string(), e))
        }
    }
}
