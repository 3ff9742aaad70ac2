//! Spreadsheet container parsing (xlsx, xls).

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use sheetform_model::{CellValue, RawSheet, SheetTable};

use crate::error::{IngestError, Result};

/// Parses every sheet of a workbook into header row plus data rows.
///
/// Blank rows inside a sheet are kept so row indices match the workbook.
/// Sheets whose cells are all empty are left out of the table.
pub fn read_workbook(name: &str, bytes: &[u8]) -> Result<SheetTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|error| IngestError::parse(name, error.to_string()))?;

    let mut table = SheetTable::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|error| IngestError::parse(name, format!("sheet '{sheet_name}': {error}")))?;

        let matrix: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
            .collect();
        let blank = matrix.iter().flatten().all(CellValue::is_blank);

        match RawSheet::from_matrix(matrix).filter(|_| !blank) {
            Some(sheet) => {
                tracing::debug!(
                    sheet = %sheet_name,
                    rows = sheet.height(),
                    columns = sheet.width(),
                    "parsed worksheet"
                );
                table.insert(sheet_name, sheet);
            }
            None => tracing::debug!(sheet = %sheet_name, "skipping empty worksheet"),
        }
    }

    if table.is_empty() {
        return Err(IngestError::parse(name, "workbook contains no data"));
    }
    Ok(table)
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(value) => CellValue::Text(value.clone()),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        // Date cells keep their serial number, as the raw cell matrix does
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => CellValue::Text(value.clone()),
        Data::Error(error) => CellValue::Text(format!("#{error:?}")),
    }
}
