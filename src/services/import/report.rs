// src/services/import/report.rs

use std::collections::BTreeMap;

use axum::http::StatusCode;

use crate::models::import::{CategoryReport, ImportReport, OpeningStockReport, RowOutcome};

/// Acumulador explícito: cada folha devolve seu `CategoryReport` e o
/// pipeline faz o merge aqui. Nada de estado global.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    details: BTreeMap<String, CategoryReport>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Garante que a categoria aparece no relatório mesmo sem linhas.
    pub fn touch(&mut self, category: &str) -> &mut CategoryReport {
        self.details.entry(category.to_string()).or_default()
    }

    pub fn merge(&mut self, category: &str, report: CategoryReport) {
        self.touch(category).merge(report);
    }

    pub fn finish(self) -> ImportReport {
        let mut report = ImportReport {
            success: false,
            message: String::new(),
            details: self.details,
        };
        let created = report.total_created();
        let errors = report.total_errors();

        report.success = created > 0;
        report.message = if created > 0 && errors == 0 {
            format!("Import completed successfully: {created} records created")
        } else if created > 0 {
            format!("Import completed with errors: {created} records created, {errors} errors")
        } else if errors > 0 {
            format!("Import failed: no records created, {errors} errors")
        } else {
            "No new records were created".to_string()
        };
        report
    }
}

impl ImportReport {
    /// Relatório genérico para falha total do pipeline.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn total_created(&self) -> usize {
        self.details.values().map(|r| r.created).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.details.values().map(|r| r.errors.len()).sum()
    }

    /// 200 quando nenhuma linha falhou, 207 quando houve erros por linha,
    /// inclusive se nada foi criado. O 500 fica só para falha do pipeline.
    pub fn http_status(&self) -> StatusCode {
        if self.total_errors() > 0 {
            StatusCode::MULTI_STATUS
        } else {
            StatusCode::OK
        }
    }
}

impl OpeningStockReport {
    pub fn finish(mut self) -> Self {
        self.message = format!(
            "Opening stock import finished: {} added, {} skipped, {} failed",
            self.added_items,
            self.skipped_items,
            self.failed_items.len()
        );
        self
    }

    pub fn record(&mut self, item_name: &str, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created => self.added_items += 1,
            RowOutcome::Unchanged => self.skipped_items += 1,
            RowOutcome::Skipped(reason) => {
                self.skipped_items += 1;
                self.skipped_reasons.push(format!("{item_name}: {reason}"));
            }
            RowOutcome::Failed(reason) => self.failed_items.push(reason),
        }
    }

    pub fn http_status(&self) -> StatusCode {
        if self.failed_items.is_empty() {
            StatusCode::OK
        } else {
            StatusCode::MULTI_STATUS
        }
    }
}
