//! Spreadsheet-to-form importer CLI.

use chrono::Utc;
use clap::Parser;
use sheetform_cli::cli::{Cli, Command};
use sheetform_cli::commands::{print_import, run_edit, run_field_types, run_import, run_inspect};
use sheetform_cli::summary::print_form_summary;
use sheetform_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Import(args) => {
            run_import(args, Utc::now()).and_then(|form| print_import(args, &form))
        }
        Command::Edit(args) => {
            run_edit(args, Utc::now()).map(|form| print_form_summary(&form, &args.forms))
        }
        Command::FieldTypes => run_field_types(),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
