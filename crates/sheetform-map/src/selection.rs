//! Per-sheet column selection and title row.

use sheetform_model::RawSheet;

use crate::error::{MappingError, Result};

/// Which columns of one sheet are kept, and which row is the title row.
///
/// `selected_columns` always has one entry per header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSelection {
    selected_columns: Vec<bool>,
    title_row_index: usize,
}

impl SheetSelection {
    /// All columns selected, title row 0.
    pub fn all(width: usize) -> Self {
        Self {
            selected_columns: vec![true; width],
            title_row_index: 0,
        }
    }

    /// Default selection for a sheet.
    pub fn for_sheet(sheet: &RawSheet) -> Self {
        Self::all(sheet.width())
    }

    pub fn width(&self) -> usize {
        self.selected_columns.len()
    }

    pub fn selected_columns(&self) -> &[bool] {
        &self.selected_columns
    }

    pub fn title_row_index(&self) -> usize {
        self.title_row_index
    }

    /// Sets the title row; `row` must index one of the sheet's data rows.
    pub fn set_title_row(&mut self, row: usize, sheet: &RawSheet) -> Result<()> {
        if row >= sheet.height() {
            return Err(MappingError::TitleRowOutOfRange {
                row,
                rows: sheet.height(),
            });
        }
        self.title_row_index = row;
        Ok(())
    }

    /// Flips one column. Toggling twice restores the previous state.
    pub fn toggle(&mut self, column: usize) -> Result<bool> {
        let width = self.width();
        let slot = self
            .selected_columns
            .get_mut(column)
            .ok_or(MappingError::ColumnOutOfRange { column, width })?;
        *slot = !*slot;
        Ok(*slot)
    }

    pub fn select_all(&mut self, selected: bool) {
        self.selected_columns.fill(selected);
    }

    pub fn is_selected(&self, column: usize) -> bool {
        self.selected_columns.get(column).copied().unwrap_or(false)
    }

    /// Selected column indices, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected_columns
            .iter()
            .enumerate()
            .filter_map(|(index, &selected)| selected.then_some(index))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected_columns.iter().filter(|&&selected| selected).count()
    }

    pub fn all_selected(&self) -> bool {
        self.selected_columns.iter().all(|&selected| selected)
    }

    /// Some, but not all, columns selected.
    pub fn is_indeterminate(&self) -> bool {
        let count = self.selected_count();
        count > 0 && count < self.width()
    }

    pub(crate) fn check_width(&self, sheet: &RawSheet) -> Result<()> {
        if self.width() != sheet.width() {
            return Err(MappingError::SelectionMismatch {
                selection: self.width(),
                width: sheet.width(),
            });
        }
        Ok(())
    }
}
