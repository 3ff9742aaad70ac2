use serde::{Deserialize, Serialize};

/// Summary statistics of one source column, used for type suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHint {
    pub is_numeric: bool,
    pub unique_ratio: f64,
    pub null_ratio: f64,
}
