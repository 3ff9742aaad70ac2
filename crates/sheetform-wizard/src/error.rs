//! Wizard and persistence error types.

use std::path::PathBuf;

use sheetform_ingest::IngestError;
use sheetform_map::MappingError;
use sheetform_model::ModelError;
use thiserror::Error;

use crate::step::WizardState;

/// Failure reported by a [`FormStore`](crate::FormStore).
///
/// A failed save leaves the wizard where it was, so the caller may retry.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The store refused the form.
    #[error("form store rejected the save: {0}")]
    Rejected(String),

    /// An update named a form the store does not hold.
    #[error("no saved form with id '{0}'")]
    UnknownForm(String),

    #[error("failed to serialize form")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write form to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SaveError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(reason) => format!("Save failed, please retry: {reason}"),
            Self::UnknownForm(id) => format!("Save failed: form {id} no longer exists"),
            Self::Serialization(_) => "Save failed: the form could not be encoded".to_string(),
            Self::Io { path, .. } => format!("Save failed: could not write {}", path.display()),
        }
    }
}

/// Errors from wizard transitions.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("import session is closed")]
    Closed,

    #[error("'{action}' is not valid while {state}")]
    InvalidTransition {
        action: &'static str,
        state: WizardState,
    },

    #[error("unknown sheet '{0}'")]
    UnknownSheet(String),

    #[error("row {row} is out of range (sheet has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("column {column} is out of range (sheet has {width} columns)")]
    ColumnOutOfRange { column: usize, width: usize },

    #[error("unknown field key '{0}'")]
    UnknownField(String),

    /// No file has been loaded, or the loaded file has no sheets.
    #[error("no data has been imported")]
    NoData,

    #[error("an upload is already in progress")]
    UploadInProgress,

    /// The upload could not be ingested; the session is back at file selection.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Mapping(MappingError),

    #[error(transparent)]
    Save(#[from] SaveError),

    /// A record edit on a saved form was out of range.
    #[error("invalid edit: {0}")]
    InvalidEdit(#[from] ModelError),
}

impl From<MappingError> for WizardError {
    fn from(error: MappingError) -> Self {
        match error {
            MappingError::ColumnOutOfRange { column, width } => {
                Self::ColumnOutOfRange { column, width }
            }
            MappingError::TitleRowOutOfRange { row, rows } => Self::RowOutOfRange { row, rows },
            MappingError::UnknownField(key) => Self::UnknownField(key),
            other => Self::Mapping(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_errors_translate() {
        let error = WizardError::from(MappingError::TitleRowOutOfRange { row: 4, rows: 2 });
        assert!(matches!(error, WizardError::RowOutOfRange { row: 4, rows: 2 }));

        let error = WizardError::from(MappingError::SelectionMismatch {
            selection: 1,
            width: 2,
        });
        assert!(matches!(error, WizardError::Mapping(_)));
    }

    #[test]
    fn test_save_error_message() {
        let error = SaveError::Rejected("quota exceeded".into());
        assert_eq!(error.user_message(), "Save failed, please retry: quota exceeded");
    }
}
