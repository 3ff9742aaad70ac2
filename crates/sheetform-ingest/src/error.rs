//! Error types for spreadsheet ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while ingesting an uploaded file.
///
/// Every variant is terminal for the current file: callers discard any
/// partial state and ask the user for a new file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Pre-parse validation ===
    /// File exceeds the configured size limit.
    #[error("file {name} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        name: String,
        size: u64,
        max_size: u64,
    },

    /// Extension is not one of the supported spreadsheet formats.
    #[error("unsupported file format: {name}")]
    UnsupportedFormat { name: String },

    // === Parsing ===
    /// Container is malformed, text could not be split, or no data was found.
    #[error("failed to parse {name}: {message}")]
    ParseFailure { name: String, message: String },

    /// Parsed sheet exceeds the row or column limit.
    #[error(
        "sheet '{sheet}' has {rows} rows and {columns} columns (limit {max_rows} rows, {max_columns} columns)"
    )]
    DataTooLarge {
        sheet: String,
        rows: usize,
        columns: usize,
        max_rows: usize,
        max_columns: usize,
    },

    // === File system ===
    /// Failed to read the file from disk.
    #[error("failed to read file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    /// Single notification text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileTooLarge { max_size, .. } => {
                format!("File size cannot exceed {} MB", max_size / (1024 * 1024))
            }
            Self::UnsupportedFormat { .. } => {
                "Only .xlsx, .xls and .csv files are supported".to_string()
            }
            Self::ParseFailure { .. } => {
                "The file could not be parsed, please check that its format is correct".to_string()
            }
            Self::DataTooLarge {
                max_rows,
                max_columns,
                ..
            } => format!(
                "File data exceeds the limit ({max_rows} rows, {max_columns} columns)"
            ),
            Self::FileRead { .. } => "The file could not be read".to_string(),
        }
    }

    pub(crate) fn parse(name: &str, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
