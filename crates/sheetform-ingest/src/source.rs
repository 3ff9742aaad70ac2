//! Uploaded files and pre-parse validation.

use std::path::Path;

use crate::error::{IngestError, Result};

/// Spreadsheet formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

impl FileFormat {
    /// Detects the format from the text after the last `.` of a file name.
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, Self::Csv)
    }
}

/// An uploaded file: its display name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, using its file name as the display name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(display_name(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map_or(self.name.as_str(), |(stem, _)| stem)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Checks size and extension before any decoding happens.
pub fn validate_upload(name: &str, size: u64, max_size: u64) -> Result<FileFormat> {
    if size > max_size {
        return Err(IngestError::FileTooLarge {
            name: name.to_string(),
            size,
            max_size,
        });
    }
    FileFormat::from_name(name).ok_or_else(|| IngestError::UnsupportedFormat {
        name: name.to_string(),
    })
}

/// Checks a file on disk from its metadata, without reading its contents.
pub fn validate_path(path: &Path, max_size: u64) -> Result<FileFormat> {
    let metadata = std::fs::metadata(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    validate_upload(&display_name(path), metadata.len(), max_size)
}
