//! The import wizard session.
//!
//! A [`WizardSession`] owns everything one import needs: the parsed file, the
//! per-sheet column selections and title rows, field type choices and form
//! info. All changes go through [`WizardSession::apply`]; values such as the
//! active steps, the "select all" indeterminate state and preview row roles
//! are computed on read.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sheetform_ingest::{IngestError, IngestOptions, SourceFile, build_column_hints, ingest_async};
use sheetform_map::{
    FieldTypes, Projection, SheetSelection, data_row_count, derive_fields, project,
};
use sheetform_model::{
    DEFAULT_FORM_GROUP, FieldSpec, FieldType, FormInfo, FormMetadata, ModelError, PersistedForm,
    RawSheet, SheetTable,
};
use tokio::sync::watch;

use crate::error::{Result, WizardError};
use crate::progress::ProgressReporter;
use crate::step::{ImportStep, WizardState};
use crate::store::FormStore;

/// States where a file may be (re)uploaded.
const UPLOADING: &[WizardState] = &[WizardState::SelectingFile, WizardState::PreviewingData];

/// States where the column selection may change.
const EDITING: &[WizardState] = &[WizardState::PreviewingData, WizardState::ConfiguringFields];

/// Name and size of the file being imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn of(file: &SourceFile) -> Self {
        Self::new(file.name.clone(), file.size())
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map_or(self.name.as_str(), |(stem, _)| stem)
    }
}

/// Every input the wizard reacts to.
#[derive(Debug)]
pub enum WizardAction {
    /// A file was chosen and parsing has started.
    BeginUpload { name: String, size: u64 },
    /// Parsing finished.
    FileLoaded {
        name: String,
        size: u64,
        table: SheetTable,
    },
    /// Parsing failed; the file is discarded.
    IngestFailed(IngestError),
    /// The host abandoned the pending upload.
    CancelUpload,
    Next,
    Previous,
    SelectSheet(String),
    /// Marks a data row of the selected sheet as the title row.
    SelectTitleRow(usize),
    ToggleColumn(usize),
    SelectAllColumns(bool),
    /// Renames a header of the selected sheet, by original column index.
    RenameHeader { column: usize, title: String },
    SetFieldType { key: String, field_type: FieldType },
    /// Sets `number` on fully numeric columns that have no type chosen yet.
    SuggestFieldTypes,
    SetFormName(String),
    SetFormGroup(String),
    Close,
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BeginUpload { .. } => "begin upload",
            Self::FileLoaded { .. } => "file loaded",
            Self::IngestFailed(_) => "ingest failed",
            Self::CancelUpload => "cancel upload",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::SelectSheet(_) => "select sheet",
            Self::SelectTitleRow(_) => "select title row",
            Self::ToggleColumn(_) => "toggle column",
            Self::SelectAllColumns(_) => "select all columns",
            Self::RenameHeader { .. } => "rename header",
            Self::SetFieldType { .. } => "set field type",
            Self::SuggestFieldTypes => "suggest field types",
            Self::SetFormName(_) => "set form name",
            Self::SetFormGroup(_) => "set form group",
            Self::Close => "close",
        }
    }
}

/// State before and after one applied action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: WizardState,
    pub to: WizardState,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// How a data row is shown in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    /// Before the title row; not imported.
    Excluded,
    Title,
    Data,
}

/// One import, from file selection to save.
#[derive(Debug, Default)]
pub struct WizardSession {
    state: WizardState,
    file: Option<FileMeta>,
    table: Option<SheetTable>,
    selected_sheet: Option<String>,
    selections: BTreeMap<String, SheetSelection>,
    field_types: BTreeMap<String, FieldTypes>,
    form_name: Option<String>,
    form_group: Option<String>,
    import_count: usize,
    pending_upload: Option<FileMeta>,
    progress: Option<ProgressReporter>,
    upload_progress: u8,
    notification: Option<String>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one action.
    ///
    /// Every action on a closed session fails with [`WizardError::Closed`].
    /// On error the session is unchanged, except for upload failures which
    /// always return to file selection.
    pub fn apply(&mut self, action: WizardAction) -> Result<Transition> {
        if self.state == WizardState::Closed {
            return Err(WizardError::Closed);
        }
        let from = self.state;
        let action_name = action.name();

        match action {
            WizardAction::BeginUpload { name, size } => {
                self.begin_upload(FileMeta::new(name, size))?;
            }
            WizardAction::FileLoaded { name, size, table } => {
                self.file_loaded(FileMeta::new(name, size), table)?;
            }
            WizardAction::IngestFailed(error) => self.ingest_failed(&error)?,
            WizardAction::CancelUpload => self.cancel_upload(),
            WizardAction::Next => self.next()?,
            WizardAction::Previous => self.previous()?,
            WizardAction::SelectSheet(name) => self.select_sheet(name)?,
            WizardAction::SelectTitleRow(row) => {
                self.require(action_name, &[WizardState::PreviewingData])?;
                let (sheet, selection) = self.active_selection()?;
                selection.set_title_row(row, sheet)?;
            }
            WizardAction::ToggleColumn(column) => {
                self.require(action_name, EDITING)?;
                self.active_selection()?.1.toggle(column)?;
            }
            WizardAction::SelectAllColumns(selected) => {
                self.require(action_name, EDITING)?;
                self.active_selection()?.1.select_all(selected);
            }
            WizardAction::RenameHeader { column, title } => {
                self.require(action_name, &[WizardState::ConfiguringFields])?;
                self.rename_header(column, title)?;
            }
            WizardAction::SetFieldType { key, field_type } => {
                self.require(action_name, &[WizardState::ConfiguringFields])?;
                let (name, width) = self
                    .active_sheet()
                    .map(|(name, sheet)| (name.to_string(), sheet.width()))?;
                self.field_types
                    .entry(name)
                    .or_default()
                    .set(&key, field_type, width)?;
            }
            WizardAction::SuggestFieldTypes => {
                self.require(action_name, &[WizardState::ConfiguringFields])?;
                let (name, sheet) = self.active_sheet()?;
                let title_row = self.selection().map_or(0, SheetSelection::title_row_index);
                let hints = build_column_hints(sheet, title_row + 1);
                let name = name.to_string();
                self.field_types
                    .entry(name)
                    .or_default()
                    .suggest_from_hints(&hints);
            }
            WizardAction::SetFormName(name) => self.form_name = non_blank(name),
            WizardAction::SetFormGroup(group) => self.form_group = non_blank(group),
            WizardAction::Close => self.close(),
        }

        let transition = Transition {
            from,
            to: self.state,
        };
        tracing::debug!(action = action_name, from = %from, to = %self.state, "wizard transition");
        Ok(transition)
    }

    /// Parses `file` on the blocking pool while the upload progress animates.
    ///
    /// On an ingest error the session returns to file selection, keeps the
    /// error's message as its notification and hands the error back. If the
    /// future is dropped before parsing finishes, the upload is cancelled.
    pub async fn upload(&mut self, file: SourceFile, options: IngestOptions) -> Result<Transition> {
        let meta = FileMeta::of(&file);
        self.apply(WizardAction::BeginUpload {
            name: meta.name.clone(),
            size: meta.size,
        })?;
        let mut guard = PendingUpload {
            session: self,
            armed: true,
        };
        let outcome = ingest_async(file, options).await;
        guard.armed = false;

        let session = &mut *guard.session;
        match outcome {
            Ok(table) => session.apply(WizardAction::FileLoaded {
                name: meta.name,
                size: meta.size,
                table,
            }),
            Err(error) => {
                session.ingest_failed(&error)?;
                Err(error.into())
            }
        }
    }

    /// Builds the form from the selected sheet and hands it to `store`.
    ///
    /// Only valid while configuring fields. If the store fails, the session
    /// stays where it is so the save can be retried.
    pub fn save<S>(&mut self, store: &mut S, now: DateTime<Utc>) -> Result<PersistedForm>
    where
        S: FormStore + ?Sized,
    {
        if self.state == WizardState::Closed {
            return Err(WizardError::Closed);
        }
        self.require("save", &[WizardState::ConfiguringFields])?;

        let form = self.build_form(now)?;
        if let Err(error) = store.save(&form) {
            tracing::warn!(error = %error, "form save failed");
            self.notification = Some(error.user_message());
            return Err(error.into());
        }

        self.state = WizardState::Importing;
        self.notification = None;
        tracing::info!(
            id = %form.id,
            fields = form.fields.len(),
            rows = form.metadata.total_rows,
            "form saved"
        );
        Ok(form)
    }

    /// The form that [`save`](Self::save) would persist at `now`.
    pub fn build_form(&self, now: DateTime<Utc>) -> Result<PersistedForm> {
        let (_, sheet) = self.active_sheet()?;
        let selection = self
            .selection()
            .cloned()
            .unwrap_or_else(|| SheetSelection::for_sheet(sheet));
        let types = self.current_field_types();

        let fields = derive_fields(sheet, &selection, &types)?;
        let data = project(sheet, &selection)?;

        Ok(PersistedForm {
            id: PersistedForm::generate_id(now),
            form_info: FormInfo {
                form_name: self.form_name().to_string(),
                form_group: self.form_group().to_string(),
                create_time: now,
                update_time: now,
            },
            fields,
            metadata: FormMetadata {
                total_rows: data.row_count(),
                selected_columns: selection.selected_columns().to_vec(),
                title_row_index: selection.title_row_index(),
                import_time: now,
            },
            data: data.into(),
        })
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn active_steps(&self) -> Vec<ImportStep> {
        self.state.active_steps()
    }

    pub fn is_step_active(&self, step: ImportStep) -> bool {
        self.state.is_step_active(step)
    }

    pub fn file(&self) -> Option<&FileMeta> {
        self.file.as_ref()
    }

    pub fn table(&self) -> Option<&SheetTable> {
        self.table.as_ref()
    }

    pub fn selected_sheet(&self) -> Option<&str> {
        self.selected_sheet.as_deref()
    }

    /// The selected sheet's parsed content.
    pub fn sheet(&self) -> Option<&RawSheet> {
        self.active_sheet().ok().map(|(_, sheet)| sheet)
    }

    /// Column selection and title row of the selected sheet.
    pub fn selection(&self) -> Option<&SheetSelection> {
        self.selected_sheet
            .as_ref()
            .and_then(|name| self.selections.get(name))
    }

    /// Some, but not all, columns of the selected sheet are selected.
    pub fn is_indeterminate(&self) -> bool {
        self.selection().is_some_and(SheetSelection::is_indeterminate)
    }

    /// Preview role of a data row of the selected sheet.
    pub fn row_role(&self, row: usize) -> RowRole {
        let title = self.selection().map_or(0, SheetSelection::title_row_index);
        match row.cmp(&title) {
            std::cmp::Ordering::Less => RowRole::Excluded,
            std::cmp::Ordering::Equal => RowRole::Title,
            std::cmp::Ordering::Greater => RowRole::Data,
        }
    }

    /// The rows and columns that will be imported, as shown while configuring.
    pub fn preview(&self) -> Result<Projection> {
        let (_, sheet) = self.active_sheet()?;
        let selection = self
            .selection()
            .cloned()
            .unwrap_or_else(|| SheetSelection::for_sheet(sheet));
        Ok(project(sheet, &selection)?)
    }

    /// Fields for the current selection and type choices.
    pub fn fields(&self) -> Result<Vec<FieldSpec>> {
        let (_, sheet) = self.active_sheet()?;
        let selection = self
            .selection()
            .cloned()
            .unwrap_or_else(|| SheetSelection::for_sheet(sheet));
        Ok(derive_fields(sheet, &selection, &self.current_field_types())?)
    }

    pub fn field_type(&self, key: &str) -> FieldType {
        self.current_field_types().get(key)
    }

    /// Data rows counted when entering the configuration step.
    pub fn import_count(&self) -> usize {
        self.import_count
    }

    /// Chosen form name, or the file name without extension.
    pub fn form_name(&self) -> &str {
        match (&self.form_name, &self.file) {
            (Some(name), _) => name,
            (None, Some(file)) => file.stem(),
            (None, None) => "",
        }
    }

    pub fn form_group(&self) -> &str {
        self.form_group.as_deref().unwrap_or(DEFAULT_FORM_GROUP)
    }

    pub fn is_upload_pending(&self) -> bool {
        self.pending_upload.is_some()
    }

    /// Cosmetic upload percentage.
    pub fn upload_progress(&self) -> u8 {
        self.progress
            .as_ref()
            .map_or(self.upload_progress, ProgressReporter::percentage)
    }

    /// Progress updates while an upload is pending.
    pub fn progress_updates(&self) -> Option<watch::Receiver<u8>> {
        self.progress.as_ref().map(ProgressReporter::subscribe)
    }

    /// Last user-facing message (ingest or save failure).
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn take_notification(&mut self) -> Option<String> {
        self.notification.take()
    }

    fn require(&self, action: &'static str, allowed: &[WizardState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    fn active_sheet(&self) -> Result<(&str, &RawSheet)> {
        let name = self.selected_sheet.as_deref().ok_or(WizardError::NoData)?;
        let sheet = self
            .table
            .as_ref()
            .and_then(|table| table.get(name))
            .ok_or(WizardError::NoData)?;
        Ok((name, sheet))
    }

    /// Selected sheet and its selection entry, created with defaults on first use.
    fn active_selection(&mut self) -> Result<(&RawSheet, &mut SheetSelection)> {
        let name = self.selected_sheet.as_deref().ok_or(WizardError::NoData)?;
        let sheet = self
            .table
            .as_ref()
            .and_then(|table| table.get(name))
            .ok_or(WizardError::NoData)?;
        let selection = self
            .selections
            .entry(name.to_string())
            .or_insert_with(|| SheetSelection::for_sheet(sheet));
        Ok((sheet, selection))
    }

    fn current_field_types(&self) -> FieldTypes {
        self.selected_sheet
            .as_ref()
            .and_then(|name| self.field_types.get(name))
            .cloned()
            .unwrap_or_default()
    }

    fn begin_upload(&mut self, meta: FileMeta) -> Result<()> {
        if self.pending_upload.is_some() {
            return Err(WizardError::UploadInProgress);
        }
        self.require("begin upload", UPLOADING)?;

        // A new file replaces whatever was parsed before.
        self.discard_data();
        self.state = WizardState::SelectingFile;
        self.notification = None;
        self.upload_progress = 0;
        self.progress = tokio::runtime::Handle::try_current()
            .is_ok()
            .then(ProgressReporter::spawn);
        tracing::info!(file = %meta.name, size = meta.size, "upload started");
        self.pending_upload = Some(meta);
        Ok(())
    }

    fn file_loaded(&mut self, meta: FileMeta, table: SheetTable) -> Result<()> {
        self.require("file loaded", UPLOADING)?;
        self.pending_upload = None;
        self.progress = None;

        let Some(first) = table.first().map(|(name, _)| name.to_string()) else {
            self.discard_data();
            self.state = WizardState::SelectingFile;
            self.upload_progress = 0;
            self.notification = Some(format!("{} contains no data", meta.name));
            return Err(WizardError::NoData);
        };

        self.discard_data();
        self.selections = table
            .iter()
            .map(|(name, sheet)| (name.to_string(), SheetSelection::for_sheet(sheet)))
            .collect();
        self.selected_sheet = Some(first);
        self.table = Some(table);
        self.file = Some(meta);
        self.upload_progress = 100;
        self.notification = None;
        self.state = WizardState::PreviewingData;
        Ok(())
    }

    fn ingest_failed(&mut self, error: &IngestError) -> Result<()> {
        self.require("ingest failed", UPLOADING)?;
        tracing::warn!(error = %error, "upload failed");
        self.pending_upload = None;
        self.progress = None;
        self.upload_progress = 0;
        self.discard_data();
        self.state = WizardState::SelectingFile;
        self.notification = Some(error.user_message());
        Ok(())
    }

    fn cancel_upload(&mut self) {
        if let Some(meta) = self.pending_upload.take() {
            tracing::info!(file = %meta.name, "upload cancelled");
        }
        self.progress = None;
        self.upload_progress = 0;
    }

    fn next(&mut self) -> Result<()> {
        match self.state {
            WizardState::SelectingFile => {
                if self.table.is_none() {
                    return Err(WizardError::NoData);
                }
                self.state = WizardState::PreviewingData;
            }
            WizardState::PreviewingData => {
                self.import_count = self.current_data_row_count()?;
                self.state = WizardState::ConfiguringFields;
            }
            _ => self.require("next", &[])?,
        }
        Ok(())
    }

    fn previous(&mut self) -> Result<()> {
        match self.state {
            WizardState::ConfiguringFields => self.state = WizardState::PreviewingData,
            WizardState::PreviewingData => self.state = WizardState::SelectingFile,
            _ => self.require("previous", &[])?,
        }
        Ok(())
    }

    fn select_sheet(&mut self, name: String) -> Result<()> {
        self.require("select sheet", EDITING)?;
        let sheet = self
            .table
            .as_ref()
            .ok_or(WizardError::NoData)?
            .get(&name)
            .ok_or_else(|| WizardError::UnknownSheet(name.clone()))?;
        self.selections
            .entry(name.clone())
            .or_insert_with(|| SheetSelection::for_sheet(sheet));
        self.selected_sheet = Some(name);
        if self.state == WizardState::ConfiguringFields {
            self.import_count = self.current_data_row_count()?;
        }
        Ok(())
    }

    fn rename_header(&mut self, column: usize, title: String) -> Result<()> {
        let name = self.selected_sheet.as_deref().ok_or(WizardError::NoData)?;
        let sheet = self
            .table
            .as_mut()
            .and_then(|table| table.get_mut(name))
            .ok_or(WizardError::NoData)?;
        sheet.rename_header(column, title).map_err(|error| match error {
            ModelError::ColumnOutOfRange { column, len } => {
                WizardError::ColumnOutOfRange { column, width: len }
            }
            ModelError::RowOutOfRange { row, len } => WizardError::RowOutOfRange { row, rows: len },
            ModelError::UnknownFieldType(key) => WizardError::UnknownField(key),
        })
    }

    fn current_data_row_count(&self) -> Result<usize> {
        let (_, sheet) = self.active_sheet()?;
        let title = self.selection().map_or(0, SheetSelection::title_row_index);
        Ok(data_row_count(sheet, title))
    }

    fn discard_data(&mut self) {
        self.file = None;
        self.table = None;
        self.selected_sheet = None;
        self.selections.clear();
        self.field_types.clear();
        self.import_count = 0;
    }

    fn close(&mut self) {
        self.discard_data();
        self.pending_upload = None;
        self.progress = None;
        self.upload_progress = 0;
        self.notification = None;
        self.form_name = None;
        self.form_group = None;
        self.state = WizardState::Closed;
        tracing::info!("import session closed");
    }
}

/// Cancels the session's pending upload unless disarmed first.
struct PendingUpload<'a> {
    session: &'a mut WizardSession,
    armed: bool,
}

impl Drop for PendingUpload<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.cancel_upload();
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
