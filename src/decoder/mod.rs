/// Decoder trait and shared types for turning source files into text.
///
/// The retrieval core never parses file formats itself: it asks a
/// [`DocumentDecoder`] for whole-file text, per-page PDF text, or CSV rows.
pub mod files;
pub mod mock;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while decoding a single source file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF parse failed for {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("CSV parse failed for {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no columns found in {0}")]
    EmptyTable(PathBuf),

    #[error("no such document: {0}")]
    NotFound(PathBuf),
}

/// Rows parsed from a tabular file, header first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    /// Each row holds exactly `columns.len()` values.
    pub rows: Vec<Vec<String>>,
}

/// Trait for file decoding implementations.
///
/// All implementations must be `Send + Sync` so a decoder can be shared
/// with a parallel loader behind `Arc`.
pub trait DocumentDecoder: Send + Sync {
    /// Read a whole text file as a string.
    fn read_text(&self, path: &Path) -> Result<String, LoadError>;

    /// Extract text per page, in page order. Pages without text yield `""`.
    fn read_pdf_pages(&self, path: &Path) -> Result<Vec<String>, LoadError>;

    /// Read the header and at most `max_rows` data rows.
    fn read_table(&self, path: &Path, max_rows: usize) -> Result<Table, LoadError>;
}
