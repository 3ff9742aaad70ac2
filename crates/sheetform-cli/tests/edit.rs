//! End-to-end tests for the `edit` command.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use sheetform_cli::cli::{Cli, Command};
use sheetform_cli::commands::{run_edit, run_import};
use sheetform_cli::output::JsonFileStore;
use sheetform_model::CellValue;
use sheetform_wizard::FormStore;
use tempfile::tempdir;

const PEOPLE_CSV: &str = "Name,Age\nAlice,30\nBob,25\nCara,41\n";

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

fn parse(argv: &[&str]) -> Command {
    let mut full = vec!["sheetform"];
    full.extend_from_slice(argv);
    Cli::try_parse_from(full).expect("valid arguments").command
}

fn import_to(input: &Path, output: &Path) -> String {
    let input_arg = input.display().to_string();
    let output_arg = output.display().to_string();
    let Command::Import(args) = parse(&[
        "import",
        &input_arg,
        "--no-progress",
        "--output",
        &output_arg,
    ]) else {
        panic!("expected import command");
    };
    run_import(&args, at(8)).unwrap().id
}

#[test]
fn edit_updates_stored_form() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.csv");
    fs::write(&input, PEOPLE_CSV).unwrap();
    let forms = dir.path().join("forms.json");
    let id = import_to(&input, &forms);
    let forms_arg = forms.display().to_string();

    let Command::Edit(args) = parse(&[
        "edit",
        &forms_arg,
        "--id",
        &id,
        "--set",
        "1,1=42",
        "--delete-row",
        "0",
        "--append-rows",
        "1",
    ]) else {
        panic!("expected edit command");
    };
    let edited = run_edit(&args, at(10)).unwrap();

    assert_eq!(edited.metadata.total_rows, 2);
    assert_eq!(
        edited.data.rows,
        vec![
            vec![CellValue::text("Cara"), CellValue::text("42")],
            vec![CellValue::text(""), CellValue::text("")],
        ]
    );
    assert_eq!(edited.form_info.update_time, at(10));
    assert_eq!(edited.form_info.create_time, at(8));
    assert_eq!(JsonFileStore::new(&forms).list().unwrap(), vec![edited]);
}

#[test]
fn edit_rejects_unknown_form() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.csv");
    fs::write(&input, PEOPLE_CSV).unwrap();
    let forms = dir.path().join("forms.json");
    import_to(&input, &forms);
    let forms_arg = forms.display().to_string();

    let Command::Edit(args) = parse(&["edit", &forms_arg, "--id", "42", "--append-rows", "1"])
    else {
        panic!("expected edit command");
    };
    let error = run_edit(&args, at(10)).unwrap_err();
    assert!(format!("{error:#}").contains("no saved form with id '42'"));
}
