//! Spreadsheet ingestion for the import wizard.
//!
//! This crate validates an uploaded file, decodes it and parses it into a
//! [`SheetTable`] of header rows and data rows.
//!
//! # Pipeline
//!
//! 1. **Validation**: size and extension are checked before any decoding
//! 2. **Decoding**: CSV text is decoded as UTF-8, GBK, or UTF-8 with GBK fallback
//! 3. **Parsing**: CSV is split into one sheet; xlsx/xls containers go through `calamine`
//! 4. **Limits**: the first sheet's row and column counts are checked
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use sheetform_ingest::{IngestOptions, ingest_path};
//!
//! let table = ingest_path(Path::new("people.csv"), &IngestOptions::default())?;
//! let (name, sheet) = table.first().expect("at least one sheet");
//! println!("{name}: {:?}", sheet.headers);
//! ```

mod csv;
mod error;
mod hints;
mod options;
mod source;
mod workbook;

use std::path::Path;
use std::time::Instant;

use sheetform_model::SheetTable;

// === Error Types ===
pub use error::{IngestError, Result};

// === Configuration ===
pub use options::{CsvDialect, CsvEncoding, IngestOptions, MAX_COLUMNS, MAX_FILE_SIZE, MAX_ROWS};

// === Sources ===
pub use source::{FileFormat, SourceFile, validate_path, validate_upload};

// === Parsing ===
pub use self::csv::{CSV_SHEET_NAME, DecodedText, decode_csv_bytes, split_quoted, split_simple};
pub use workbook::read_workbook;

// === Column Hints ===
pub use hints::build_column_hints;

/// Validates, decodes and parses an uploaded file.
pub fn ingest(file: &SourceFile, options: &IngestOptions) -> Result<SheetTable> {
    let format = validate_upload(&file.name, file.size(), options.max_file_size)?;
    let start = Instant::now();

    let table = if format.is_text() {
        self::csv::read_csv_table(&file.name, &file.bytes, options)?
    } else {
        read_workbook(&file.name, &file.bytes)?
    };
    check_limits(&table, options)?;

    tracing::info!(
        file = %file.name,
        sheets = table.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(table)
}

/// Validates a file on disk from its metadata, then reads and ingests it.
pub fn ingest_path(path: &Path, options: &IngestOptions) -> Result<SheetTable> {
    validate_path(path, options.max_file_size)?;
    let file = SourceFile::from_path(path)?;
    ingest(&file, options)
}

/// Runs [`ingest`] on the blocking thread pool.
///
/// The returned future resolves when parsing finishes, independently of any
/// progress display.
pub async fn ingest_async(file: SourceFile, options: IngestOptions) -> Result<SheetTable> {
    let name = file.name.clone();
    tokio::task::spawn_blocking(move || ingest(&file, &options))
        .await
        .map_err(|error| IngestError::ParseFailure {
            name,
            message: format!("ingest task failed: {error}"),
        })?
}

/// Only the first sheet is checked against the row and column limits.
fn check_limits(table: &SheetTable, options: &IngestOptions) -> Result<()> {
    let Some((sheet_name, sheet)) = table.first() else {
        return Ok(());
    };
    let (rows, columns) = (sheet.height(), sheet.width());
    if rows > options.max_rows || columns > options.max_columns {
        return Err(IngestError::DataTooLarge {
            sheet: sheet_name.to_string(),
            rows,
            columns,
            max_rows: options.max_rows,
            max_columns: options.max_columns,
        });
    }
    Ok(())
}
