use std::collections::BTreeSet;
use std::io::{self, IsTerminal};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use sheetform_ingest::{
    IngestOptions, SourceFile, build_column_hints, ingest_async, ingest_path, validate_path,
};
use sheetform_model::PersistedForm;
use sheetform_wizard::{FileMeta, MemoryFormStore, WizardAction, WizardSession, edit_form};
use tracing::info_span;

use crate::cli::{EditArgs, ImportArgs, InspectArgs};
use crate::output::JsonFileStore;
use crate::summary::{
    field_types_table, hints_table, preview_table, print_form_summary, sheets_table,
};

pub fn run_field_types() -> Result<()> {
    println!("{}", field_types_table());
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let path = &args.source.file;
    let table = ingest_path(path, &args.source.ingest_options())
        .with_context(|| format!("read {}", path.display()))?;
    if let Some(wanted) = &args.sheet
        && !table.contains(wanted)
    {
        bail!("unknown sheet '{wanted}'");
    }

    println!("File: {}", path.display());
    println!("{}", sheets_table(&table));
    for (name, sheet) in table.iter() {
        if args.sheet.as_deref().is_some_and(|wanted| wanted != name) {
            continue;
        }
        println!();
        println!("Sheet: {name}");
        println!("{}", preview_table(sheet, args.rows));
        println!("{}", hints_table(sheet, &build_column_hints(sheet, 0)));
    }
    Ok(())
}

/// Runs the whole wizard non-interactively and saves the form at `now`.
///
/// With `--output` the form is written there; otherwise it is kept in memory
/// and only returned.
pub fn run_import(args: &ImportArgs, now: DateTime<Utc>) -> Result<PersistedForm> {
    let path = &args.source.file;
    let span = info_span!("import", file = %path.display());
    let _guard = span.enter();

    let options = args.source.ingest_options();
    validate_path(path, options.max_file_size)
        .with_context(|| format!("validate {}", path.display()))?;
    let file = SourceFile::from_path(path).with_context(|| format!("read {}", path.display()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let mut session = WizardSession::new();
    runtime.block_on(load_file(&mut session, file, options, !args.no_progress))?;

    configure(&mut session, args)?;

    let form = match &args.output {
        Some(output) => {
            let mut store = JsonFileStore::new(output);
            session.save(&mut store, now)
        }
        None => session.save(&mut MemoryFormStore::new(), now),
    }
    .context("save form")?;
    Ok(form)
}

/// Prints the summary when the form went to a file, or the JSON itself.
pub fn print_import(args: &ImportArgs, form: &PersistedForm) -> Result<()> {
    match &args.output {
        Some(output) => print_form_summary(form, output),
        None => println!(
            "{}",
            serde_json::to_string_pretty(form).context("encode form")?
        ),
    }
    Ok(())
}

/// Applies the requested record edits to one saved form at `now`.
pub fn run_edit(args: &EditArgs, now: DateTime<Utc>) -> Result<PersistedForm> {
    let path = &args.forms;
    if !path.exists() {
        bail!("form file {} does not exist", path.display());
    }
    let edits = args.edits();
    if edits.is_empty() {
        bail!("no edits requested");
    }
    let mut store = JsonFileStore::new(path);
    edit_form(&mut store, &args.id, edits, now)
        .with_context(|| format!("edit form {} in {}", args.id, path.display()))
}

async fn load_file(
    session: &mut WizardSession,
    file: SourceFile,
    options: IngestOptions,
    show_progress: bool,
) -> Result<()> {
    let meta = FileMeta::of(&file);
    session.apply(WizardAction::BeginUpload {
        name: meta.name.clone(),
        size: meta.size,
    })?;

    let bar = upload_bar(&meta.name, show_progress);
    let animation = session.progress_updates().map(|mut updates| {
        let bar = bar.clone();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let percent = *updates.borrow_and_update();
                bar.set_position(u64::from(percent));
            }
        })
    });

    let outcome = match ingest_async(file, options).await {
        Ok(table) => session
            .apply(WizardAction::FileLoaded {
                name: meta.name.clone(),
                size: meta.size,
                table,
            })
            .map(drop)
            .with_context(|| format!("load {}", meta.name)),
        Err(error) => {
            let detail = error.to_string();
            session.apply(WizardAction::IngestFailed(error))?;
            let message = session.take_notification().unwrap_or_default();
            Err(anyhow::anyhow!("{message} ({detail})"))
        }
    };

    // The reporter is gone after either outcome, which ends the animation.
    if let Some(animation) = animation {
        animation.await.ok();
    }
    bar.finish_and_clear();
    outcome
}

fn configure(session: &mut WizardSession, args: &ImportArgs) -> Result<()> {
    if let Some(sheet) = &args.sheet {
        session
            .apply(WizardAction::SelectSheet(sheet.clone()))
            .with_context(|| format!("select sheet '{sheet}'"))?;
    }
    if args.title_row != 0 {
        session
            .apply(WizardAction::SelectTitleRow(args.title_row))
            .context("select title row")?;
    }
    let excluded: BTreeSet<usize> = args.exclude.iter().copied().collect();
    for column in excluded {
        session
            .apply(WizardAction::ToggleColumn(column))
            .with_context(|| format!("exclude column {column}"))?;
    }

    session.apply(WizardAction::Next)?;
    tracing::info!(rows = session.import_count(), "configuring fields");

    for (column, title) in &args.rename {
        session
            .apply(WizardAction::RenameHeader {
                column: *column,
                title: title.clone(),
            })
            .with_context(|| format!("rename column {column}"))?;
    }
    for (key, field_type) in &args.field_types {
        session
            .apply(WizardAction::SetFieldType {
                key: key.clone(),
                field_type: *field_type,
            })
            .with_context(|| format!("set type of {key}"))?;
    }
    if args.suggest_types {
        session.apply(WizardAction::SuggestFieldTypes)?;
    }
    if let Some(name) = &args.form_name {
        session.apply(WizardAction::SetFormName(name.clone()))?;
    }
    if let Some(group) = &args.form_group {
        session.apply(WizardAction::SetFormGroup(group.clone()))?;
    }
    Ok(())
}

fn upload_bar(name: &str, visible: bool) -> ProgressBar {
    if !visible || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos:>3}%") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(format!("Reading {name}"));
    bar
}
