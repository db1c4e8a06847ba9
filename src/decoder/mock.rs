/// In-memory decoder for tests and embedders that already hold content.
///
/// Content is keyed by the exact path the loader will ask for, so a test can
/// describe a PDF as a list of page strings without producing a real PDF.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{DocumentDecoder, LoadError, Table};

#[derive(Debug, Clone)]
enum Entry {
    Text(String),
    Pages(Vec<String>),
    Table(Table),
    Broken(String),
}

#[derive(Debug, Default, Clone)]
pub struct MockDecoder {
    entries: HashMap<PathBuf, Entry>,
}

impl MockDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, path: impl Into<PathBuf>, text: &str) -> Self {
        self.entries.insert(path.into(), Entry::Text(text.to_string()));
        self
    }

    pub fn with_pages(mut self, path: impl Into<PathBuf>, pages: &[&str]) -> Self {
        let pages = pages.iter().map(|p| p.to_string()).collect();
        self.entries.insert(path.into(), Entry::Pages(pages));
        self
    }

    pub fn with_table(mut self, path: impl Into<PathBuf>, columns: &[&str], rows: &[&[&str]]) -> Self {
        let table = Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        };
        self.entries.insert(path.into(), Entry::Table(table));
        self
    }

    /// Register a path whose every read fails as a corrupt PDF would.
    pub fn with_broken(mut self, path: impl Into<PathBuf>, message: &str) -> Self {
        self.entries.insert(path.into(), Entry::Broken(message.to_string()));
        self
    }

    fn get(&self, path: &Path) -> Result<&Entry, LoadError> {
        match self.entries.get(path) {
            Some(Entry::Broken(message)) => Err(LoadError::Pdf {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
            Some(entry) => Ok(entry),
            None => Err(LoadError::NotFound(path.to_path_buf())),
        }
    }
}

impl DocumentDecoder for MockDecoder {
    fn read_text(&self, path: &Path) -> Result<String, LoadError> {
        match self.get(path)? {
            Entry::Text(t) => Ok(t.clone()),
            Entry::Pages(p) => Ok(p.join("\n")),
            _ => Err(LoadError::NotFound(path.to_path_buf())),
        }
    }

    fn read_pdf_pages(&self, path: &Path) -> Result<Vec<String>, LoadError> {
        match self.get(path)? {
            Entry::Pages(p) => Ok(p.clone()),
            Entry::Text(t) => Ok(vec![t.clone()]),
            _ => Err(LoadError::NotFound(path.to_path_buf())),
        }
    }

    fn read_table(&self, path: &Path, max_rows: usize) -> Result<Table, LoadError> {
        match self.get(path)? {
            Entry::Table(t) => Ok(Table {
                columns: t.columns.clone(),
                rows: t.rows.iter().take(max_rows).cloned().collect(),
            }),
            _ => Err(LoadError::NotFound(path.to_path_buf())),
        }
    }
}
