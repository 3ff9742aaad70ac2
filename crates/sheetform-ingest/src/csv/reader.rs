//! CSV text splitting.

use csv::ReaderBuilder;
use sheetform_model::{CellValue, RawSheet, SheetTable};

use crate::error::{IngestError, Result};
use crate::options::{CsvDialect, IngestOptions};

use super::decode::decode_csv_bytes;

/// Sheet name given to the single sheet of a CSV upload.
pub const CSV_SHEET_NAME: &str = "Sheet1";

fn normalize_cell(raw: &str) -> String {
    raw.trim().to_string()
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

/// Splits on `\n` then `,`, trimming lines and cells.
pub fn split_simple(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| line.trim().split(',').map(normalize_cell).collect::<Vec<_>>())
        .filter(|row| !is_blank_row(row))
        .collect()
}

/// Parses RFC 4180 records, allowing rows of differing length.
pub fn split_quoted(text: &str) -> std::result::Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if !is_blank_row(&row) {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Decodes and splits a CSV upload into a single-sheet table.
pub fn read_csv_table(name: &str, bytes: &[u8], options: &IngestOptions) -> Result<SheetTable> {
    let decoded = decode_csv_bytes(bytes, options.encoding);
    tracing::debug!(file = name, encoding = decoded.encoding.name(), "decoded CSV text");

    let rows = match options.dialect {
        CsvDialect::Simple => split_simple(&decoded.text),
        CsvDialect::Quoted => split_quoted(&decoded.text)
            .map_err(|error| IngestError::parse(name, error.to_string()))?,
    };

    let matrix = rows
        .into_iter()
        .map(|row| row.into_iter().map(CellValue::Text).collect())
        .collect();
    let sheet = RawSheet::from_matrix(matrix)
        .ok_or_else(|| IngestError::parse(name, "file contains no data"))?;
    Ok(SheetTable::single(CSV_SHEET_NAME, sheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_trims_and_drops_blank_rows() {
        let rows = split_simple(" Name , Age \r\n\nAlice,30\r\n , \nBob,25\n");
        assert_eq!(
            rows,
            vec![
                vec!["Name", "Age"],
                vec!["Alice", "30"],
                vec!["Bob", "25"],
            ]
        );
    }

    #[test]
    fn test_split_simple_does_not_honour_quotes() {
        let rows = split_simple("A,B\n\"x,y\",z\n");
        assert_eq!(rows[1], vec!["\"x", "y\"", "z"]);
    }

    #[test]
    fn test_split_quoted_keeps_quoted_commas() {
        let rows = split_quoted("A,B\n\"x,y\",z\n\"multi\nline\",w\n").expect("parse csv");
        assert_eq!(rows[1], vec!["x,y", "z"]);
        assert_eq!(rows[2], vec!["multi\nline", "w"]);
    }

    #[test]
    fn test_split_keeps_ragged_rows() {
        let rows = split_simple("A,B,C\n1\n2,3,4,5\n");
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[2].len(), 4);
    }

    #[test]
    fn test_read_csv_table_requires_data() {
        let result = read_csv_table("empty.csv", b"\n , \n", &IngestOptions::default());
        assert!(matches!(result, Err(IngestError::ParseFailure { .. })));
    }

    #[test]
    fn test_read_csv_table_single_sheet() {
        let table = read_csv_table("people.csv", b"Name,Age\nAlice,30\n", &IngestOptions::default())
            .expect("read csv");
        assert_eq!(table.sheet_names(), &[CSV_SHEET_NAME.to_string()]);
        let sheet = table.get(CSV_SHEET_NAME).expect("sheet");
        assert_eq!(sheet.headers, vec!["Name", "Age"]);
        assert_eq!(sheet.rows, vec![vec![CellValue::text("Alice"), CellValue::text("30")]]);
    }
}
