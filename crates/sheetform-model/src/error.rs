use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("column {column} is out of range (sheet has {len} columns)")]
    ColumnOutOfRange { column: usize, len: usize },
    #[error("row {row} is out of range (sheet has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
    #[error("unknown field type '{0}'")]
    UnknownFieldType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
