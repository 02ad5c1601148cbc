// src/services/import/template.rs
//
// Direção inversa do leitor: gera o modelo de planilha que o importador aceita.
// Os nomes de folha e cabeçalhos daqui SÃO o contrato do leitor.

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};

use crate::{common::error::AppError, models::import::SheetKind};

pub const TEMPLATE_FILE_NAME: &str = "import_template.xlsx";
pub const INSTRUCTIONS_SHEET: &str = "Instructions";

#[derive(Debug, Clone, Copy)]
enum Example {
    Text(&'static str),
    Number(f64),
}

use Example::{Number, Text};

/// Cabeçalhos canônicos por folha, na ordem em que aparecem no modelo.
pub fn template_headers(kind: SheetKind) -> &'static [&'static str] {
    match kind {
        SheetKind::Customers => &["customerName", "phone"],
        SheetKind::Suppliers => &["supplierName", "contact", "country"],
        SheetKind::ItemsPrices => &["supplierName", "itemName", "price"],
        SheetKind::OpeningBalances => &["customerName", "balanceType", "amount", "notes"],
        SheetKind::OpeningStock => &["suppliername", "itemname", "quantity", "price", "openingstock"],
    }
}

fn example_rows(kind: SheetKind) -> &'static [&'static [Example]] {
    match kind {
        SheetKind::Customers => &[
            &[Text("John Doe"), Text("+1 555 0100")],
            &[Text("Jane Smith"), Text("+1 555 0101")],
        ],
        SheetKind::Suppliers => &[
            &[Text("Acme Trading"), Text("Carlos Lima"), Text("Brazil")],
            &[Text("Global Foods"), Text("Mei Chen"), Text("China")],
        ],
        SheetKind::ItemsPrices => &[
            &[Text("Acme Trading"), Text("Rice 25kg"), Number(42.5)],
            &[Text("Global Foods"), Text("Green Tea 1kg"), Number(18.0)],
        ],
        SheetKind::OpeningBalances => &[
            &[Text("John Doe"), Text("debit"), Number(1500.0), Text("Owed before migration")],
            &[Text("Jane Smith"), Text("credit"), Number(750.25), Text("Advance payment")],
        ],
        SheetKind::OpeningStock => &[
            &[Text("Acme Trading"), Text("Beans 10kg"), Number(100.0), Number(12.0), Text("openingstock")],
            &[Text("Global Foods"), Text("Black Tea 1kg"), Number(40.0), Number(9.5), Text("openingstock")],
        ],
    }
}

const INSTRUCTIONS: &[&str] = &[
    "How to fill in this workbook",
    "",
    "Fill one row per record below the header row. Do not rename sheets or headers.",
    "Sheets are imported in this order: Customers, Suppliers, Items & Prices, Opening Balances, Opening Stock.",
    "Names must match exactly (case-sensitive) across sheets.",
    "",
    "Customers: customerName and phone are required.",
    "Suppliers: supplierName, contact and country are required.",
    "Items & Prices: supplierName must exist in Suppliers; itemName required; price must be greater than 0.",
    "Opening Balances: customerName must exist in Customers; amount must be greater than 0; notes optional.",
    "  balanceType = debit  -> the customer owes you (recorded as a sale).",
    "  balanceType = credit -> you owe the customer (recorded as a payment).",
    "Opening Stock: suppliername, itemname, quantity > 0 and price > 0 are required.",
    "  openingstock is optional and groups rows into a container (default: openingstock).",
    "  Rows whose supplier item already exists are skipped.",
    "",
    "Re-importing the same workbook does not duplicate existing records.",
];

/// Gera o modelo completo (.xlsx) em memória.
pub fn generate_template() -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();

    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2));

    write_instructions(workbook.add_worksheet(), &title_format)?;

    for kind in SheetKind::IMPORT_ORDER {
        write_sheet(workbook.add_worksheet(), kind, &header_format)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_instructions(sheet: &mut Worksheet, title_format: &Format) -> Result<(), XlsxError> {
    sheet.set_name(INSTRUCTIONS_SHEET)?;
    sheet.set_column_width(0, 110)?;

    for (row, line) in INSTRUCTIONS.iter().enumerate() {
        if row == 0 {
            sheet.write_string_with_format(0, 0, *line, title_format)?;
        } else if !line.is_empty() {
            sheet.write_string(row as u32, 0, *line)?;
        }
    }
    Ok(())
}

fn write_sheet(sheet: &mut Worksheet, kind: SheetKind, header_format: &Format) -> Result<(), XlsxError> {
    sheet.set_name(kind.canonical_name())?;

    for (col, header) in template_headers(kind).iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, header_format)?;
        sheet.set_column_width(col as u16, 22)?;
    }

    for (idx, row) in example_rows(kind).iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            match value {
                Text(s) => sheet.write_string(row_num, col as u16, *s)?,
                Number(n) => sheet.write_number(row_num, col as u16, *n)?,
            };
        }
    }
    Ok(())
}
