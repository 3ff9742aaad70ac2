//! CLI argument definitions for the spreadsheet importer.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sheetform_ingest::{CsvDialect, CsvEncoding, IngestOptions};
use sheetform_model::{CellValue, DataEdit, FieldType};
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "sheetform",
    version,
    about = "Turn spreadsheets into form definitions",
    long_about = "Import .xlsx, .xls and .csv files as form records.\n\n\
                  Pick a sheet, a title row and the columns to keep, assign field\n\
                  types, and write the resulting form as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

impl Cli {
    /// Logging configuration from CLI flags.
    ///
    /// `--log-level` beats `-v/-q`; with neither, `RUST_LOG` may override.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            ..LogConfig::default()
        };
        config.use_env_filter = !(self.verbosity.is_present() || self.log_level.is_some());
        if let Some(level) = self.log_level {
            config.level_filter = level.into();
        }
        config.format = self.log_format.into();
        config.log_file = self.log_file.clone();
        config.with_timestamps = self.log_timestamps;
        config.with_target = self.log_target;
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the sheets of a file, a preview of its rows and column statistics.
    Inspect(InspectArgs),

    /// Import a file as a form and write the form as JSON.
    Import(ImportArgs),

    /// Edit the records of a form saved with `import --output`.
    Edit(EditArgs),

    /// List the available field types.
    FieldTypes,
}

/// Options shared by every command that reads a spreadsheet.
#[derive(clap::Args, Clone)]
pub struct SourceArgs {
    /// Spreadsheet to read (.xlsx, .xls or .csv).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Text encoding of CSV files.
    #[arg(long = "encoding", value_enum, default_value = "auto")]
    pub encoding: EncodingArg,

    /// CSV splitting rules.
    #[arg(long = "dialect", value_enum, default_value = "simple")]
    pub dialect: DialectArg,

    /// Largest accepted file, in bytes.
    #[arg(long = "max-file-size", value_name = "BYTES")]
    pub max_file_size: Option<u64>,
}

impl SourceArgs {
    pub fn ingest_options(&self) -> IngestOptions {
        let mut options = IngestOptions::default()
            .with_encoding(self.encoding.into())
            .with_dialect(self.dialect.into());
        if let Some(max) = self.max_file_size {
            options = options.with_max_file_size(max);
        }
        options
    }
}

#[derive(Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Sheet to preview (default: every sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Number of data rows to show per sheet.
    #[arg(long = "rows", value_name = "N", default_value_t = 10)]
    pub rows: usize,
}

#[derive(Parser)]
pub struct ImportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Sheet to import (default: the first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Data row used as the title row; it and every row before it are skipped.
    #[arg(long = "title-row", value_name = "INDEX", default_value_t = 0)]
    pub title_row: usize,

    /// Column indices to leave out (comma separated or repeated).
    #[arg(long = "exclude", value_name = "INDEX", value_delimiter = ',')]
    pub exclude: Vec<usize>,

    /// Rename a column header, e.g. `--rename 0="Full name"`.
    #[arg(long = "rename", value_name = "INDEX=TITLE", value_parser = parse_rename)]
    pub rename: Vec<(usize, String)>,

    /// Field type for a field key, e.g. `--type field_1=number`.
    #[arg(long = "type", value_name = "KEY=TYPE", value_parser = parse_field_type)]
    pub field_types: Vec<(String, FieldType)>,

    /// Use `number` for fully numeric columns without an explicit type.
    #[arg(long = "suggest-types")]
    pub suggest_types: bool,

    /// Form name (default: the file name without extension).
    #[arg(long = "form-name", value_name = "NAME")]
    pub form_name: Option<String>,

    /// Form group.
    #[arg(long = "form-group", value_name = "GROUP")]
    pub form_group: Option<String>,

    /// Write the form JSON here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Do not draw the upload progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[derive(Parser)]
pub struct EditArgs {
    /// Form file written by `import --output`.
    #[arg(value_name = "FORMS")]
    pub forms: PathBuf,

    /// Id of the form to edit.
    #[arg(long = "id", value_name = "ID")]
    pub id: String,

    /// Rename a data column, e.g. `--rename 0="Full name"`.
    #[arg(long = "rename", value_name = "INDEX=TITLE", value_parser = parse_rename)]
    pub rename: Vec<(usize, String)>,

    /// Set a cell, e.g. `--set 0,1=42`.
    #[arg(long = "set", value_name = "ROW,COLUMN=VALUE", value_parser = parse_cell)]
    pub set: Vec<(usize, usize, String)>,

    /// Append this many empty rows.
    #[arg(long = "append-rows", value_name = "N", default_value_t = 0)]
    pub append_rows: usize,

    /// Delete a row by its index before the edit (comma separated or repeated).
    #[arg(long = "delete-row", value_name = "INDEX", value_delimiter = ',')]
    pub delete_rows: Vec<usize>,
}

impl EditArgs {
    /// Renames, cell updates, appends, then deletes from the last row up.
    pub fn edits(&self) -> Vec<DataEdit> {
        let mut edits: Vec<DataEdit> = self
            .rename
            .iter()
            .map(|(column, title)| DataEdit::RenameHeader {
                column: *column,
                title: title.clone(),
            })
            .collect();
        edits.extend(self.set.iter().map(|(row, column, value)| DataEdit::SetCell {
            row: *row,
            column: *column,
            value: CellValue::text(value.as_str()),
        }));
        edits.extend(std::iter::repeat_n(DataEdit::AppendRow, self.append_rows));

        let mut deletes = self.delete_rows.clone();
        deletes.sort_unstable_by(|a, b| b.cmp(a));
        deletes.dedup();
        edits.extend(deletes.into_iter().map(DataEdit::DeleteRow));
        edits
    }
}

fn parse_rename(value: &str) -> Result<(usize, String), String> {
    let (index, title) = value
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=TITLE, got '{value}'"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| format!("'{index}' is not a column index"))?;
    Ok((index, title.to_string()))
}

fn parse_cell(value: &str) -> Result<(usize, usize, String), String> {
    let (position, cell) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ROW,COLUMN=VALUE, got '{value}'"))?;
    let (row, column) = position
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COLUMN, got '{position}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("'{row}' is not a row index"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("'{column}' is not a column index"))?;
    Ok((row, column, cell.to_string()))
}

fn parse_field_type(value: &str) -> Result<(String, FieldType), String> {
    let (key, kind) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=TYPE, got '{value}'"))?;
    let field_type = kind.parse::<FieldType>().map_err(|error| error.to_string())?;
    Ok((key.trim().to_string(), field_type))
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EncodingArg {
    Auto,
    Utf8,
    Gbk,
}

impl From<EncodingArg> for CsvEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Auto => Self::Auto,
            EncodingArg::Utf8 => Self::Utf8,
            EncodingArg::Gbk => Self::Gbk,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DialectArg {
    Simple,
    Quoted,
}

impl From<DialectArg> for CsvDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Simple => Self::Simple,
            DialectArg::Quoted => Self::Quoted,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn test_import_arguments() {
        let cli = parse(&[
            "sheetform",
            "import",
            "people.csv",
            "--exclude",
            "0,2",
            "--type",
            "field_1=number",
            "--rename",
            "1=Years",
            "--encoding",
            "gbk",
        ]);
        let Command::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(args.exclude, vec![0, 2]);
        assert_eq!(
            args.field_types,
            vec![("field_1".to_string(), FieldType::Number)]
        );
        assert_eq!(args.rename, vec![(1, "Years".to_string())]);
        assert_eq!(args.source.ingest_options().encoding, CsvEncoding::Gbk);
    }

    #[test]
    fn test_edit_arguments_order_edits() {
        let cli = parse(&[
            "sheetform",
            "edit",
            "forms.json",
            "--id",
            "1",
            "--delete-row",
            "0,3",
            "--set",
            "1,0=Zoe",
            "--append-rows",
            "1",
        ]);
        let Command::Edit(args) = cli.command else {
            panic!("expected edit command");
        };
        assert_eq!(
            args.edits(),
            vec![
                DataEdit::SetCell {
                    row: 1,
                    column: 0,
                    value: CellValue::text("Zoe"),
                },
                DataEdit::AppendRow,
                DataEdit::DeleteRow(3),
                DataEdit::DeleteRow(0),
            ]
        );
        assert!(parse_cell("1=2").is_err());
    }

    #[test]
    fn test_bad_field_type_is_rejected() {
        let result = Cli::try_parse_from(["sheetform", "import", "a.csv", "--type", "field_0=color"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_overrides_verbosity() {
        let cli = parse(&["sheetform", "-v", "--log-level", "error", "field-types"]);
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::ERROR);
        assert!(!config.use_env_filter);

        let cli = parse(&["sheetform", "field-types"]);
        assert!(cli.log_config().use_env_filter);
    }

    #[test]
    fn test_log_line_flags() {
        let config = parse(&["sheetform", "field-types", "--log-timestamps"]).log_config();
        assert!(config.with_timestamps);
        assert!(!config.with_target);

        let config = parse(&["sheetform", "--log-target", "field-types"]).log_config();
        assert!(config.with_target);
        assert!(!config.with_timestamps);
    }
}
