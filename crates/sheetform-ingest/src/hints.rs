//! Column statistics for field type suggestions.

use std::collections::BTreeSet;

use sheetform_model::{ColumnHint, RawSheet};

/// Builds one hint per header column, in column order.
///
/// `rows_from` skips leading rows (e.g. everything up to a title row).
pub fn build_column_hints(sheet: &RawSheet, rows_from: usize) -> Vec<ColumnHint> {
    let rows = sheet.rows.get(rows_from..).unwrap_or_default();
    let row_count = rows.len();
    (0..sheet.width())
        .map(|col_idx| {
            let mut non_null = 0usize;
            let mut numeric = 0usize;
            let mut uniques = BTreeSet::new();
            for row in rows {
                let Some(cell) = row.get(col_idx) else {
                    continue;
                };
                if cell.is_blank() {
                    continue;
                }
                non_null += 1;
                uniques.insert(cell.to_string());
                if cell.as_f64().is_some() {
                    numeric += 1;
                }
            }
            let null_ratio = if row_count == 0 {
                1.0
            } else {
                (row_count.saturating_sub(non_null)) as f64 / row_count as f64
            };
            let unique_ratio = if non_null == 0 {
                0.0
            } else {
                uniques.len() as f64 / non_null as f64
            };
            ColumnHint {
                is_numeric: non_null > 0 && numeric == non_null,
                unique_ratio,
                null_ratio,
            }
        })
        .collect()
}
