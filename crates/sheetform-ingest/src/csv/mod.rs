//! CSV decoding and splitting.

mod decode;
mod reader;

pub use decode::{DecodedText, decode_csv_bytes};
pub use reader::{CSV_SHEET_NAME, read_csv_table, split_quoted, split_simple};
