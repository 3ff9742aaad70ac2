//! Parsed sheet tables.
//!
//! A [`SheetTable`] holds every non-empty sheet of one uploaded file, keyed by
//! sheet name and kept in workbook order. Each [`RawSheet`] is the sheet's
//! first row (`headers`) and the remaining rows, exactly as read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::error::{ModelError, Result};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One sheet: header row plus data rows.
///
/// Rows are not normalized to the header width; a row may be shorter or
/// longer than `headers`. Use [`RawSheet::cell`] for padded access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// Splits a cell matrix into header row and data rows.
    ///
    /// Returns `None` for an empty matrix. Header cells are stringified.
    pub fn from_matrix(mut matrix: Vec<Vec<CellValue>>) -> Option<Self> {
        if matrix.is_empty() {
            return None;
        }
        let rows = matrix.split_off(1);
        let headers = matrix
            .into_iter()
            .next()
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect();
        Some(Self { headers, rows })
    }

    /// Number of columns (header width).
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (excludes the header row).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn header(&self, column: usize) -> Option<&str> {
        self.headers.get(column).map(String::as_str)
    }

    /// Cell at `(row, column)`; missing cells of ragged rows read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// True when any row's length differs from the header width.
    pub fn is_ragged(&self) -> bool {
        let width = self.width();
        self.rows.iter().any(|row| row.len() != width)
    }

    /// Replaces the header text of one column in place.
    pub fn rename_header(&mut self, column: usize, title: impl Into<String>) -> Result<()> {
        let len = self.headers.len();
        let header = self
            .headers
            .get_mut(column)
            .ok_or(ModelError::ColumnOutOfRange { column, len })?;
        *header = title.into();
        Ok(())
    }
}

/// All sheets parsed from one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetTable {
    names: Vec<String>,
    sheets: BTreeMap<String, RawSheet>,
}

impl SheetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table holding a single sheet.
    pub fn single(name: impl Into<String>, sheet: RawSheet) -> Self {
        let mut table = Self::new();
        table.insert(name, sheet);
        table
    }

    /// Adds a sheet; re-inserting an existing name replaces it in place.
    pub fn insert(&mut self, name: impl Into<String>, sheet: RawSheet) {
        let name = name.into();
        if self.sheets.insert(name.clone(), sheet).is_none() {
            self.names.push(name);
        }
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RawSheet> {
        self.sheets.get_mut(name)
    }

    /// First sheet in workbook order.
    pub fn first(&self) -> Option<(&str, &RawSheet)> {
        let name = self.names.first()?;
        self.sheets.get(name).map(|sheet| (name.as_str(), sheet))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawSheet)> {
        self.names
            .iter()
            .filter_map(|name| self.sheets.get(name).map(|sheet| (name.as_str(), sheet)))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(values: &[&str]) -> Vec<CellValue> {
        values.iter().copied().map(CellValue::from).collect()
    }

    #[test]
    fn from_matrix_splits_header_row() {
        let sheet = RawSheet::from_matrix(vec![
            vec![CellValue::text("Name"), CellValue::Number(2024.0)],
            text_row(&["Alice", "30"]),
        ])
        .expect("non-empty matrix");
        assert_eq!(sheet.headers, vec!["Name", "2024"]);
        assert_eq!(sheet.height(), 1);
        assert!(RawSheet::from_matrix(Vec::new()).is_none());
    }

    #[test]
    fn cell_pads_ragged_rows() {
        let sheet = RawSheet::new(
            vec!["A".into(), "B".into()],
            vec![text_row(&["1"]), text_row(&["2", "3"])],
        );
        assert!(sheet.is_ragged());
        assert_eq!(sheet.cell(0, 1), &CellValue::Empty);
        assert_eq!(sheet.cell(1, 1), &CellValue::text("3"));
        assert_eq!(sheet.cell(9, 0), &CellValue::Empty);
    }

    #[test]
    fn rename_header_checks_range() {
        let mut sheet = RawSheet::new(vec!["A".into()], Vec::new());
        sheet.rename_header(0, "Alpha").expect("rename");
        assert_eq!(sheet.header(0), Some("Alpha"));
        assert_eq!(
            sheet.rename_header(3, "x"),
            Err(ModelError::ColumnOutOfRange { column: 3, len: 1 })
        );
    }

    #[test]
    fn table_keeps_workbook_order() {
        let mut table = SheetTable::new();
        table.insert("Zeta", RawSheet::default());
        table.insert("Alpha", RawSheet::default());
        table.insert("Zeta", RawSheet::new(vec!["x".into()], Vec::new()));
        assert_eq!(table.sheet_names(), &["Zeta".to_string(), "Alpha".to_string()]);
        assert_eq!(table.first().map(|(name, _)| name), Some("Zeta"));
        assert_eq!(table.get("Zeta").map(RawSheet::width), Some(1));
        assert_eq!(table.len(), 2);
    }
}
