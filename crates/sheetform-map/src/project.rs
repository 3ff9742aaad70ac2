//! Projection of a sheet onto its selected columns.

use sheetform_model::{CellValue, FormData, RawSheet};

use crate::error::Result;
use crate::selection::SheetSelection;

/// Selected headers and the data rows after the title row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Projection {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl From<Projection> for FormData {
    fn from(projection: Projection) -> Self {
        FormData {
            headers: projection.headers,
            rows: projection.rows,
        }
    }
}

/// Number of data rows that follow the title row.
pub fn data_row_count(sheet: &RawSheet, title_row_index: usize) -> usize {
    sheet.height().saturating_sub(title_row_index + 1)
}

/// Projects `sheet` onto the selected columns.
///
/// Rows up to and including the title row are dropped. Cells missing from
/// short rows come out as [`CellValue::Empty`]; cells past the header width
/// are never selected.
pub fn project(sheet: &RawSheet, selection: &SheetSelection) -> Result<Projection> {
    selection.check_width(sheet)?;
    let indices = selection.selected_indices();

    let headers = indices
        .iter()
        .map(|&column| sheet.headers[column].clone())
        .collect();

    let first_data_row = selection.title_row_index() + 1;
    let rows = (first_data_row..sheet.height())
        .map(|row| {
            indices
                .iter()
                .map(|&column| sheet.cell(row, column).clone())
                .collect()
        })
        .collect();

    Ok(Projection { headers, rows })
}
