//! Integration tests for file ingestion.

use std::io::Write;

use proptest::prelude::*;
use rust_xlsxwriter::Workbook;
use sheetform_ingest::{
    CSV_SHEET_NAME, CsvDialect, IngestError, IngestOptions, SourceFile, ingest, ingest_async,
    ingest_path,
};
use sheetform_model::CellValue;
use tempfile::NamedTempFile;

fn text_row(values: &[&str]) -> Vec<CellValue> {
    values.iter().copied().map(CellValue::from).collect()
}

fn workbook_bytes() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let people = workbook.add_worksheet();
    people.set_name("People").unwrap();
    people.write_string(0, 0, "Name").unwrap();
    people.write_string(0, 1, "Age").unwrap();
    people.write_string(1, 0, "Alice").unwrap();
    people.write_number(1, 1, 30.0).unwrap();
    people.write_string(2, 0, "Bob").unwrap();
    people.write_number(2, 1, 25.0).unwrap();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "Note").unwrap();
    for row in 1..=5 {
        notes.write_string(row, 0, "x").unwrap();
    }

    workbook.add_worksheet().set_name("Blank").unwrap();
    workbook.save_to_buffer().unwrap()
}

#[test]
fn csv_scenario_parses_headers_and_rows() {
    let file = SourceFile::new("people.csv", "Name,Age\nAlice,30\nBob,25\n");
    let table = ingest(&file, &IngestOptions::default()).expect("ingest csv");

    let sheet = table.get(CSV_SHEET_NAME).expect("csv sheet");
    assert_eq!(sheet.headers, vec!["Name", "Age"]);
    assert_eq!(
        sheet.rows,
        vec![text_row(&["Alice", "30"]), text_row(&["Bob", "25"])]
    );
}

#[test]
fn oversized_file_fails_before_decoding() {
    // Not valid in any format; a decode attempt would report ParseFailure.
    let file = SourceFile::new("junk.xlsx", vec![0xFFu8; 64]);
    let options = IngestOptions::default().with_max_file_size(16);
    let result = ingest(&file, &options);
    assert!(matches!(
        result,
        Err(IngestError::FileTooLarge {
            size: 64,
            max_size: 16,
            ..
        })
    ));
}

#[test]
fn wrong_extension_fails_before_decoding() {
    let file = SourceFile::new("people.txt", "Name,Age\n");
    let result = ingest(&file, &IngestOptions::default());
    assert!(matches!(result, Err(IngestError::UnsupportedFormat { .. })));
}

#[test]
fn row_limit_applies_to_first_sheet() {
    let file = SourceFile::new("people.csv", "Name\na\nb\nc\n");
    let options = IngestOptions::default().with_limits(2, 500);
    let result = ingest(&file, &options);
    assert!(matches!(
        result,
        Err(IngestError::DataTooLarge { rows: 3, .. })
    ));
}

#[test]
fn column_limit_applies_to_first_sheet() {
    let file = SourceFile::new("wide.csv", "A,B,C\n1,2,3\n");
    let options = IngestOptions::default().with_limits(100, 2);
    let result = ingest(&file, &options);
    assert!(matches!(
        result,
        Err(IngestError::DataTooLarge { columns: 3, .. })
    ));
}

#[test]
fn workbook_sheets_parse_in_order() {
    let file = SourceFile::new("people.xlsx", workbook_bytes());
    let table = ingest(&file, &IngestOptions::default()).expect("ingest xlsx");

    assert_eq!(
        table.sheet_names(),
        &["People".to_string(), "Notes".to_string()]
    );
    let people = table.get("People").expect("people sheet");
    assert_eq!(people.headers, vec!["Name", "Age"]);
    assert_eq!(
        people.rows,
        vec![
            vec![CellValue::text("Alice"), CellValue::Number(30.0)],
            vec![CellValue::text("Bob"), CellValue::Number(25.0)],
        ]
    );
    assert_eq!(table.get("Notes").map(|sheet| sheet.height()), Some(5));
}

#[test]
fn workbook_keeps_blank_rows_between_records() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(1, 0, "Alice").unwrap();
    sheet.write_string(3, 0, "Bob").unwrap();
    let file = SourceFile::new("gaps.xlsx", workbook.save_to_buffer().unwrap());

    let table = ingest(&file, &IngestOptions::default()).expect("ingest xlsx");
    let (_, sheet) = table.first().expect("one sheet");
    assert_eq!(sheet.height(), 3);
    assert_eq!(sheet.cell(0, 0), &CellValue::text("Alice"));
    assert!(sheet.cell(1, 0).is_blank());
    assert_eq!(sheet.cell(2, 0), &CellValue::text("Bob"));
}

#[test]
fn only_first_sheet_is_limited() {
    // "Notes" has 5 rows, above the limit, but only "People" (2 rows) is checked.
    let file = SourceFile::new("people.xlsx", workbook_bytes());
    let options = IngestOptions::default().with_limits(2, 500);
    let table = ingest(&file, &options).expect("second sheet is not limited");
    assert_eq!(table.len(), 2);
}

#[test]
fn corrupt_workbook_is_parse_failure() {
    let file = SourceFile::new("broken.xls", b"PK\x03\x04 truncated".to_vec());
    let result = ingest(&file, &IngestOptions::default());
    assert!(matches!(result, Err(IngestError::ParseFailure { .. })));
}

#[test]
fn quoted_dialect_is_opt_in() {
    let file = SourceFile::new("quoted.csv", "City,Note\n\"Paris, FR\",ok\n");
    let simple = ingest(&file, &IngestOptions::default()).expect("simple");
    assert_eq!(simple.get(CSV_SHEET_NAME).unwrap().rows[0].len(), 3);

    let options = IngestOptions::default().with_dialect(CsvDialect::Quoted);
    let quoted = ingest(&file, &options).expect("quoted");
    assert_eq!(
        quoted.get(CSV_SHEET_NAME).unwrap().rows[0],
        text_row(&["Paris, FR", "ok"])
    );
}

#[test]
fn ingest_path_reads_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "A,B\n1,2\n").unwrap();
    let table = ingest_path(file.path(), &IngestOptions::default()).expect("ingest path");
    assert_eq!(table.get(CSV_SHEET_NAME).unwrap().headers, vec!["A", "B"]);
}

#[test]
fn ingest_path_checks_size_from_metadata() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "A,B\n1,2\n").unwrap();
    let options = IngestOptions::default().with_max_file_size(4);
    let result = ingest_path(file.path(), &options);
    assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
}

#[test]
fn ingest_path_reports_missing_file() {
    let file = NamedTempFile::new().unwrap();
    let path = file.path().with_extension("csv");
    drop(file);
    let result = ingest_path(&path, &IngestOptions::default());
    assert!(matches!(result, Err(IngestError::FileRead { .. })));
}

#[tokio::test]
async fn ingest_async_completes() {
    let file = SourceFile::new("people.csv", "Name,Age\nAlice,30\n");
    let table = ingest_async(file, IngestOptions::default())
        .await
        .expect("async ingest");
    assert_eq!(table.len(), 1);
}

proptest! {
    #[test]
    fn csv_rows_are_trimmed_and_never_blank(
        grid in prop::collection::vec(prop::collection::vec("[ a-z0-9]{0,4}", 1..5), 1..8)
    ) {
        let text: String = grid
            .iter()
            .map(|row| row.join(","))
            .collect::<Vec<_>>()
            .join("\n");
        let file = SourceFile::new("grid.csv", text);
        match ingest(&file, &IngestOptions::default()) {
            Ok(table) => {
                let sheet = table.get(CSV_SHEET_NAME).unwrap();
                for header in &sheet.headers {
                    prop_assert_eq!(header.trim(), header.as_str());
                }
                for row in &sheet.rows {
                    prop_assert!(!row.iter().all(CellValue::is_blank));
                    for cell in row {
                        let text = cell.as_text().unwrap();
                        prop_assert_eq!(text.trim(), text);
                    }
                }
            }
            Err(IngestError::ParseFailure { .. }) => {
                // Every generated line was blank.
                prop_assert!(grid.iter().all(|row| row.iter().all(|cell| cell.trim().is_empty())));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
