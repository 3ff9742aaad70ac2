//! Data model shared by the sheetform crates.
//!
//! - [`SheetTable`] / [`RawSheet`]: parsed spreadsheet content
//! - [`FieldSpec`] / [`FieldType`]: form fields derived from columns
//! - [`PersistedForm`]: the record emitted when an import is saved

pub mod cell;
pub mod error;
pub mod field;
pub mod form;
pub mod hint;
pub mod sheet;

pub use cell::CellValue;
pub use error::{ModelError, Result};
pub use field::{FieldRule, FieldSpec, FieldType, field_key, parse_field_key};
pub use form::{DEFAULT_FORM_GROUP, DataEdit, FormData, FormInfo, FormMetadata, PersistedForm};
pub use hint::ColumnHint;
pub use sheet::{RawSheet, SheetTable};
