//! Error types for column mapping.

use thiserror::Error;

/// Errors from selection and projection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Column index outside the header width.
    #[error("column {column} is out of range (sheet has {width} columns)")]
    ColumnOutOfRange { column: usize, width: usize },
    /// Title row index outside the data rows.
    #[error("title row {row} is out of range (sheet has {rows} rows)")]
    TitleRowOutOfRange { row: usize, rows: usize },
    /// Selection built for a sheet of a different width.
    #[error("selection covers {selection} columns but the sheet has {width}")]
    SelectionMismatch { selection: usize, width: usize },
    /// Field key not of the form `field_<index>` or not a selected column.
    #[error("unknown field key '{0}'")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, MappingError>;
