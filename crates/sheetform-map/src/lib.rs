//! Column and field mapping for imported sheets.
//!
//! Given a parsed [`RawSheet`](sheetform_model::RawSheet) and the user's
//! [`SheetSelection`], this crate projects the data rows onto the selected
//! columns and derives one [`FieldSpec`](sheetform_model::FieldSpec) per
//! selected column.

mod error;
mod fields;
mod project;
mod selection;

pub use error::{MappingError, Result};
pub use fields::{FieldTypes, derive_fields};
pub use project::{Projection, data_row_count, project};
pub use selection::SheetSelection;
