// src/models/import.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// =============================================================================
//  1. FORMA BRUTA (fronteira do leitor de planilhas)
// =============================================================================

/// Valor bruto de uma célula, como veio da planilha.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Texto aparado; `None` para célula vazia ou só com espaços.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(f) => format_number(*f),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        };
        if text.is_empty() { None } else { Some(text) }
    }

    /// Conversão numérica independente de locale (ponto como separador decimal).
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(f) => Decimal::try_from(*f).ok(),
            CellValue::Text(s) => {
                let s = s.trim();
                s.parse::<Decimal>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .and_then(|f| Decimal::try_from(f).ok())
                })
            }
            CellValue::Bool(_) | CellValue::Empty => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Number(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Empty => Value::Null,
        }
    }
}

// Inteiros "de planilha" (ex: telefone 5551234.0) viram "5551234".
fn format_number(f: f64) -> String {
    if f == f.floor() && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Chave de cabeçalho normalizada: minúsculas, só alfanuméricos.
/// `supplierName`, `suppliername` e `Supplier Name` são a mesma coluna.
pub fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct RawCell {
    header: String,
    key: String,
    value: CellValue,
}

/// Uma linha de dados: cabeçalho → valor bruto, na ordem das colunas.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Número da linha na planilha (o cabeçalho é a linha 1).
    pub row_number: usize,
    cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        Self { row_number, cells: Vec::new() }
    }

    pub fn with(mut self, header: &str, value: CellValue) -> Self {
        self.push(header, value);
        self
    }

    pub fn push(&mut self, header: &str, value: CellValue) {
        self.cells.push(RawCell {
            header: header.trim().to_string(),
            key: header_key(header),
            value,
        });
    }

    /// Primeira célula cujo cabeçalho bate com algum dos nomes aceitos.
    pub fn get(&self, names: &[&str]) -> Option<&CellValue> {
        names.iter().find_map(|name| {
            let key = header_key(name);
            self.cells
                .iter()
                .find(|cell| cell.key == key && cell.value.as_text().is_some())
                .map(|cell| &cell.value)
        })
    }

    pub fn text(&self, names: &[&str]) -> Option<String> {
        self.get(names).and_then(CellValue::as_text)
    }

    pub fn decimal(&self, names: &[&str]) -> Option<Decimal> {
        self.get(names).and_then(CellValue::as_decimal)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.value.as_text().is_none())
    }

    /// JSON compacto da linha original, usado nas mensagens de erro.
    pub fn to_json_string(&self) -> String {
        let mut map = Map::new();
        for cell in &self.cells {
            map.insert(cell.header.clone(), cell.value.to_json());
        }
        Value::Object(map).to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// Pasta de trabalho decodificada: folhas na ordem física do arquivo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookData {
    pub sheets: Vec<SheetData>,
}

impl WorkbookData {
    /// Primeira folha reconhecida como do tipo pedido.
    pub fn sheet(&self, kind: SheetKind) -> Option<&SheetData> {
        self.sheets
            .iter()
            .find(|sheet| SheetKind::from_sheet_name(&sheet.name) == Some(kind))
    }

    /// Folha do tipo pedido ou, na falta dela, a primeira folha do arquivo.
    pub fn sheet_or_first(&self, kind: SheetKind) -> Option<&SheetData> {
        self.sheet(kind).or_else(|| self.sheets.first())
    }
}

// =============================================================================
//  2. TIPOS DE FOLHA (o contrato de esquema)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Customers,
    Suppliers,
    ItemsPrices,
    OpeningBalances,
    OpeningStock,
}

impl SheetKind {
    /// Ordem fixa de processamento: pais antes dos dependentes.
    pub const IMPORT_ORDER: [SheetKind; 5] = [
        SheetKind::Customers,
        SheetKind::Suppliers,
        SheetKind::ItemsPrices,
        SheetKind::OpeningBalances,
        SheetKind::OpeningStock,
    ];

    /// Nomes aceitos para a folha; o primeiro é o canônico (usado no modelo).
    pub fn sheet_names(self) -> &'static [&'static str] {
        match self {
            SheetKind::Customers => &["Customers"],
            SheetKind::Suppliers => &["Suppliers"],
            SheetKind::ItemsPrices => &["Items & Prices", "Supplier Items & Prices"],
            SheetKind::OpeningBalances => &["Opening Balances", "Customer Opening Balances"],
            SheetKind::OpeningStock => &["Opening Stock", "Container Items"],
        }
    }

    pub fn canonical_name(self) -> &'static str {
        self.sheet_names()[0]
    }

    pub fn from_sheet_name(name: &str) -> Option<SheetKind> {
        let wanted = name.trim().to_lowercase();
        Self::IMPORT_ORDER
            .into_iter()
            .find(|kind| kind.sheet_names().iter().any(|n| n.to_lowercase() == wanted))
    }

    /// Nome da categoria no relatório final.
    pub fn category(self) -> &'static str {
        match self {
            SheetKind::Customers => "customers",
            SheetKind::Suppliers => "suppliers",
            SheetKind::ItemsPrices => "items",
            SheetKind::OpeningBalances => "balances",
            SheetKind::OpeningStock => "openingStock",
        }
    }
}

// =============================================================================
//  3. REGISTROS NORMALIZADOS (união marcada por tipo de folha)
// =============================================================================

pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceType {
    Debit,
    Credit,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CustomerRecord {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SupplierRecord {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub contact: String,
    #[validate(length(min = 1))]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SupplierItemRecord {
    #[validate(length(min = 1))]
    pub supplier_name: String,
    #[validate(length(min = 1))]
    pub item_name: String,
    #[validate(custom(function = "validate_positive"))]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct OpeningBalanceRecord {
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub balance_type: BalanceType,
    #[validate(custom(function = "validate_positive"))]
    pub amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct OpeningStockRecord {
    #[validate(length(min = 1))]
    pub supplier_name: String,
    #[validate(length(min = 1))]
    pub item_name: String,
    #[validate(custom(function = "validate_positive"))]
    pub quantity: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub price: Decimal,
    /// Rótulo de agrupamento (coluna openingstock / containerNo), se informado.
    pub group_label: Option<String>,
}

/// Linha do upload simples de container (sem fornecedor).
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ContainerItemRecord {
    #[validate(length(min = 1))]
    pub item_name: String,
    #[validate(custom(function = "validate_positive"))]
    pub quantity: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub price: Decimal,
}

/// Linha do fluxo simples de saldo inicial (uma folha só).
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CustomerBalanceRecord {
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub phone: Option<String>,
    #[validate(custom(function = "validate_positive"))]
    pub opening_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedRow {
    Customer(CustomerRecord),
    Supplier(SupplierRecord),
    SupplierItem(SupplierItemRecord),
    OpeningBalance(OpeningBalanceRecord),
    OpeningStock(OpeningStockRecord),
}

/// Linha rejeitada: a linha original (JSON) e o motivo legível.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    pub row_number: usize,
    pub raw: String,
    pub reason: String,
}

impl RowRejection {
    pub fn invalid_data(row: &RawRow) -> Self {
        let raw = row.to_json_string();
        Self {
            row_number: row.row_number,
            reason: format!("Invalid data: {raw}"),
            raw,
        }
    }

    pub fn with_reason(row: &RawRow, reason: impl Into<String>) -> Self {
        Self {
            row_number: row.row_number,
            raw: row.to_json_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
//  4. RESULTADO POR LINHA E RELATÓRIOS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Created,
    /// Chave natural já existia: idempotente e silencioso.
    Unchanged,
    /// Linha válida, mas a entidade já existia; contado com motivo.
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    pub created: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl CategoryReport {
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created => self.created += 1,
            RowOutcome::Unchanged => {}
            RowOutcome::Skipped(_) => self.skipped += 1,
            RowOutcome::Failed(reason) => self.errors.push(reason),
        }
    }

    pub fn merge(&mut self, other: CategoryReport) {
        self.created += other.created;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    #[schema(example = "Import completed with errors: 12 records created, 1 errors")]
    pub message: String,
    pub details: BTreeMap<String, CategoryReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpeningStockReport {
    pub message: String,
    pub added_items: usize,
    pub skipped_items: usize,
    /// "<itemName>: <motivo>" para cada linha pulada.
    pub skipped_reasons: Vec<String>,
    pub failed_items: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RawRow {
        RawRow::new(2)
            .with("Supplier Name", CellValue::Text("  Acme  ".into()))
            .with("price", CellValue::Text(" 12.50 ".into()))
            .with("phone", CellValue::Number(5551234.0))
            .with("notes", CellValue::Empty)
    }

    #[test]
    fn header_lookup_ignores_case_spacing_and_underscores() {
        let row = row();
        assert_eq!(row.text(&["supplierName"]), Some("Acme".into()));
        assert_eq!(row.text(&["supplier_name"]), Some("Acme".into()));
        assert_eq!(row.text(&["notes"]), None);
        assert_eq!(row.text(&["missing", "suppliername"]), Some("Acme".into()));
    }

    #[test]
    fn numbers_are_parsed_without_locale() {
        let row = row();
        assert_eq!(row.decimal(&["price"]), Some(Decimal::new(1250, 2)));
        assert_eq!(row.text(&["phone"]), Some("5551234".into()));
        assert_eq!(CellValue::Text("1,5".into()).as_decimal(), None);
        assert_eq!(CellValue::Text("1e3".into()).as_decimal(), Some(Decimal::from(1000)));
        assert_eq!(CellValue::Text("abc".into()).as_decimal(), None);
    }

    #[test]
    fn sheet_names_resolve_aliases() {
        assert_eq!(SheetKind::from_sheet_name(" customer opening balances "), Some(SheetKind::OpeningBalances));
        assert_eq!(SheetKind::from_sheet_name("Supplier Items & Prices"), Some(SheetKind::ItemsPrices));
        assert_eq!(SheetKind::from_sheet_name("Container Items"), Some(SheetKind::OpeningStock));
        assert_eq!(SheetKind::from_sheet_name("Instructions"), None);
    }

    #[test]
    fn category_report_counts_outcomes() {
        let mut report = CategoryReport::default();
        report.record(RowOutcome::Created);
        report.record(RowOutcome::Unchanged);
        report.record(RowOutcome::Skipped("Item already in container".into()));
        report.record(RowOutcome::Failed("Supplier not found: Acme".into()));

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors, vec!["Supplier not found: Acme".to_string()]);
    }

    #[test]
    fn raw_row_renders_as_json() {
        let json: Value = serde_json::from_str(&row().to_json_string()).unwrap();
        assert_eq!(json["Supplier Name"], "  Acme  ");
        assert_eq!(json["notes"], Value::Null);
    }
}
