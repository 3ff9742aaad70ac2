//! The persisted form record emitted by a completed import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::error::{ModelError, Result};
use crate::field::FieldSpec;

/// Form group used when none is chosen.
pub const DEFAULT_FORM_GROUP: &str = "Ungrouped";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    pub form_name: String,
    pub form_group: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// Imported records after column filtering and title-row slicing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
    pub total_rows: usize,
    /// Column selection over the original header row.
    pub selected_columns: Vec<bool>,
    pub title_row_index: usize,
    pub import_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedForm {
    pub id: String,
    pub form_info: FormInfo,
    pub fields: Vec<FieldSpec>,
    pub data: FormData,
    pub metadata: FormMetadata,
}

impl PersistedForm {
    /// Save-time identifier: the save timestamp in milliseconds.
    pub fn generate_id(now: DateTime<Utc>) -> String {
        now.timestamp_millis().to_string()
    }

    /// Applies record edits and refreshes the update time and row count.
    ///
    /// Edits are applied in order; on the first failure the form is left
    /// untouched.
    pub fn apply_edits(
        &mut self,
        edits: impl IntoIterator<Item = DataEdit>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut data = self.data.clone();
        let mut fields = self.fields.clone();
        for edit in edits {
            if let DataEdit::RenameHeader { column, title } = &edit
                && let Some(field) = fields.get_mut(*column)
            {
                field.retitle(title.clone());
            }
            data.apply(edit)?;
        }
        self.metadata.total_rows = data.rows.len();
        self.data = data;
        self.fields = fields;
        self.form_info.update_time = now;
        Ok(())
    }
}

/// A single edit to a form's imported records.
#[derive(Debug, Clone, PartialEq)]
pub enum DataEdit {
    RenameHeader { column: usize, title: String },
    SetCell {
        row: usize,
        column: usize,
        value: CellValue,
    },
    /// Appends a row of empty text cells, one per header.
    AppendRow,
    DeleteRow(usize),
}

impl FormData {
    pub fn apply(&mut self, edit: DataEdit) -> Result<()> {
        let width = self.headers.len();
        match edit {
            DataEdit::RenameHeader { column, title } => {
                let header = self
                    .headers
                    .get_mut(column)
                    .ok_or(ModelError::ColumnOutOfRange { column, len: width })?;
                *header = title;
            }
            DataEdit::SetCell { row, column, value } => {
                if column >= width {
                    return Err(ModelError::ColumnOutOfRange { column, len: width });
                }
                let len = self.rows.len();
                let cells = self
                    .rows
                    .get_mut(row)
                    .ok_or(ModelError::RowOutOfRange { row, len })?;
                if cells.len() <= column {
                    cells.resize(column + 1, CellValue::Empty);
                }
                cells[column] = value;
            }
            DataEdit::AppendRow => {
                self.rows.push(vec![CellValue::text(""); width]);
            }
            DataEdit::DeleteRow(row) => {
                let len = self.rows.len();
                if row >= len {
                    return Err(ModelError::RowOutOfRange { row, len });
                }
                self.rows.remove(row);
            }
        }
        Ok(())
    }
}
