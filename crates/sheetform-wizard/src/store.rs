//! Form persistence capability.

use chrono::{DateTime, Utc};
use sheetform_model::{DataEdit, PersistedForm};

use crate::error::{SaveError, WizardError};

/// Where completed imports are saved.
pub trait FormStore {
    /// Adds a form to the collection.
    fn save(&mut self, form: &PersistedForm) -> Result<(), SaveError>;

    /// Replaces the stored form with the same id.
    fn update(&mut self, form: &PersistedForm) -> Result<(), SaveError>;

    /// Every saved form, in save order.
    fn list(&self) -> Result<Vec<PersistedForm>, SaveError>;
}

/// Applies record edits to the saved form `id` and stores the result.
///
/// Nothing is written if any edit fails.
pub fn edit_form<S>(
    store: &mut S,
    id: &str,
    edits: impl IntoIterator<Item = DataEdit>,
    now: DateTime<Utc>,
) -> Result<PersistedForm, WizardError>
where
    S: FormStore + ?Sized,
{
    let mut form = store
        .list()?
        .into_iter()
        .find(|form| form.id == id)
        .ok_or_else(|| SaveError::UnknownForm(id.to_string()))?;
    form.apply_edits(edits, now)?;
    store.update(&form)?;
    tracing::info!(id = %form.id, rows = form.metadata.total_rows, "form edited");
    Ok(form)
}

/// In-memory store, in save order.
#[derive(Debug, Default)]
pub struct MemoryFormStore {
    forms: Vec<PersistedForm>,
    fail_next: Option<String>,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next save fail with [`SaveError::Rejected`].
    pub fn fail_next_save(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PersistedForm> {
        self.forms.iter().find(|form| form.id == id)
    }

}

impl FormStore for MemoryFormStore {
    fn save(&mut self, form: &PersistedForm) -> Result<(), SaveError> {
        if let Some(reason) = self.fail_next.take() {
            return Err(SaveError::Rejected(reason));
        }
        self.forms.push(form.clone());
        Ok(())
    }

    fn update(&mut self, form: &PersistedForm) -> Result<(), SaveError> {
        let stored = self
            .forms
            .iter_mut()
            .find(|stored| stored.id == form.id)
            .ok_or_else(|| SaveError::UnknownForm(form.id.clone()))?;
        *stored = form.clone();
        Ok(())
    }

    fn list(&self) -> Result<Vec<PersistedForm>, SaveError> {
        Ok(self.forms.clone())
    }
}
