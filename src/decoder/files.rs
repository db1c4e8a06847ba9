/// Filesystem decoder backed by `lopdf` and `csv`.
use std::fs;
use std::path::Path;

use tracing::debug;

use super::{DocumentDecoder, LoadError, Table};

/// Decodes files straight from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDecoder;

impl FileDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Decode raw bytes as UTF-8, keeping every valid run and dropping the bytes
/// that are not valid UTF-8. A leading BOM is left for the normalizer.
pub fn decode_bytes(raw: &[u8]) -> String {
    raw.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

impl DocumentDecoder for FileDecoder {
    fn read_text(&self, path: &Path) -> Result<String, LoadError> {
        let raw = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(decode_bytes(&raw))
    }

    fn read_pdf_pages(&self, path: &Path) -> Result<Vec<String>, LoadError> {
        let doc = lopdf::Document::load(path).map_err(|e| LoadError::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // get_pages() is keyed by 1-based page number, already in order
        let pages = doc.get_pages();
        let mut out = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => out.push(text),
                Err(e) => {
                    debug!(
                        "no text on page {page_number} of {}: {e}",
                        path.display()
                    );
                    out.push(String::new());
                }
            }
        }
        Ok(out)
    }

    fn read_table(&self, path: &Path, max_rows: usize) -> Result<Table, LoadError> {
        let csv_err = |source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.to_string())
            .collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(LoadError::EmptyTable(path.to_path_buf()));
        }

        let mut rows = Vec::new();
        for record in reader.records().take(max_rows) {
            let record = record.map_err(csv_err)?;
            let row = (0..columns.len())
                .map(|i| record.get(i).unwrap_or_default().to_string())
                .collect();
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }
}
