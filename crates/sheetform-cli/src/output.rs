//! Writing saved forms to disk.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sheetform_model::PersistedForm;
use sheetform_wizard::{FormStore, SaveError};

/// A form store backed by one JSON file holding an array of forms.
///
/// Saves append to the array; every write replaces the file atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JsonFileStore {
    fn write_all(&self, forms: &[PersistedForm]) -> Result<(), SaveError> {
        let json = serde_json::to_vec_pretty(forms)?;
        write_atomic(&self.path, &json)
    }
}

impl FormStore for JsonFileStore {
    fn save(&mut self, form: &PersistedForm) -> Result<(), SaveError> {
        let mut forms = self.list()?;
        forms.push(form.clone());
        self.write_all(&forms)?;
        tracing::info!(path = %self.path.display(), forms = forms.len(), "wrote form");
        Ok(())
    }

    fn update(&mut self, form: &PersistedForm) -> Result<(), SaveError> {
        let mut forms = self.list()?;
        let stored = forms
            .iter_mut()
            .find(|stored| stored.id == form.id)
            .ok_or_else(|| SaveError::UnknownForm(form.id.clone()))?;
        *stored = form.clone();
        self.write_all(&forms)?;
        tracing::info!(path = %self.path.display(), id = %form.id, "updated form");
        Ok(())
    }

    fn list(&self) -> Result<Vec<PersistedForm>, SaveError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SaveError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Writes `bytes` to a sibling temp file, syncs it, then renames it over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(source) = written {
        fs::remove_file(&temp_path).ok();
        return Err(SaveError::Io {
            path: temp_path,
            source,
        });
    }

    fs::rename(&temp_path, path).map_err(|source| {
        fs::remove_file(&temp_path).ok();
        SaveError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SaveError {
    let path = path.to_path_buf();
    move |source| SaveError::Io { path, source }
}
