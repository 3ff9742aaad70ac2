//! Ingestion limits and parsing choices.

/// Maximum accepted upload size (5 MiB).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum data rows in the first sheet.
pub const MAX_ROWS: usize = 50_000;

/// Maximum columns in the first sheet.
pub const MAX_COLUMNS: usize = 500;

/// Text encoding used to decode CSV bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvEncoding {
    /// Decode as UTF-8; if the result contains U+FFFD, decode again as GBK.
    ///
    /// This is a heuristic. Valid UTF-8 that contains U+FFFD is re-decoded
    /// needlessly, and GBK text that happens to be valid UTF-8 is kept as is.
    #[default]
    Auto,
    Utf8,
    Gbk,
}

/// How CSV text is split into cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvDialect {
    /// Split lines on `\n` and cells on `,`. Quoted commas and embedded
    /// newlines are not supported.
    #[default]
    Simple,
    /// RFC 4180 quoting via the `csv` crate.
    Quoted,
}

/// Configuration for [`crate::ingest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub max_file_size: u64,
    pub max_rows: usize,
    pub max_columns: usize,
    pub encoding: CsvEncoding,
    pub dialect: CsvDialect,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_rows: MAX_ROWS,
            max_columns: MAX_COLUMNS,
            encoding: CsvEncoding::default(),
            dialect: CsvDialect::default(),
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, max_rows: usize, max_columns: usize) -> Self {
        self.max_rows = max_rows;
        self.max_columns = max_columns;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: CsvEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }
}
