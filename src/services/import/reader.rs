// src/services/import/reader.rs

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use crate::{
    common::error::AppError,
    models::import::{CellValue, RawRow, SheetData, WorkbookData},
};

/// Decodifica o buffer binário em folhas → linhas brutas (cabeçalho → célula).
/// Não tem efeitos colaterais; qualquer falha vira `AppError::WorkbookParse`.
pub fn read_workbook(bytes: &[u8]) -> Result<WorkbookData, AppError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::WorkbookParse(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| AppError::WorkbookParse(format!("sheet '{name}': {e}")))?;

        sheets.push(SheetData {
            rows: rows_from_range(&range),
            name,
        });
    }

    Ok(WorkbookData { sheets })
}

fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    // Número da primeira linha usada (0-based). A planilha pode começar abaixo de A1.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, data_row) in rows.enumerate() {
        // Cabeçalho = linha first_row + 1 (1-based); dados começam logo abaixo.
        let mut row = RawRow::new(first_row + idx + 2);

        for (col_idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let cell = data_row.get(col_idx).map(cell_value).unwrap_or(CellValue::Empty);
            row.push(header, cell);
        }

        // Pula linhas completamente em branco
        if row.is_blank() {
            continue;
        }
        records.push(row);
    }

    records
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}
