//! Corpus ingestion: directory scan, per-format loaders, text cleanup.
//!
//! Files are visited in a fixed order (text, then PDF, then CSV; paths sorted
//! within each kind) and every file is loaded independently. A file that
//! fails to decode is logged and recorded in [`CorpusLoad::failures`]; it never
//! aborts the build.

pub mod loaders;
pub mod normalize;
pub mod segment;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::decoder::{DocumentDecoder, LoadError};

pub use normalize::normalize;
pub use segment::{DEFAULT_MIN_PARAGRAPH_CHARS, segment, segment_or_whole};

/// Default cap on data rows read from a single CSV file.
pub const DEFAULT_MAX_TABLE_ROWS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Text,
    Pdf,
    Tabular,
}

impl ChunkKind {
    /// Processing order of the directory scan.
    pub const ALL: [ChunkKind; 3] = [ChunkKind::Text, ChunkKind::Pdf, ChunkKind::Tabular];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ChunkKind::Text => "txt",
            ChunkKind::Pdf => "pdf",
            ChunkKind::Tabular => "csv",
        }
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.extension() == ext)
    }
}

/// Where a chunk came from inside its file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Locator {
    Text { chunk_index: usize },
    Pdf { page: usize, chunk_index: usize },
    Tabular { row_index: usize, columns: Vec<String> },
}

/// One retrievable unit of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub id: String,
    pub source_path: String,
    pub text: String,
    pub locator: Locator,
}

impl Chunk {
    #[must_use]
    pub fn kind(&self) -> ChunkKind {
        match self.locator {
            Locator::Text { .. } => ChunkKind::Text,
            Locator::Pdf { .. } => ChunkKind::Pdf,
            Locator::Tabular { .. } => ChunkKind::Tabular,
        }
    }
}

/// Knobs for the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub min_paragraph_chars: usize,
    pub max_table_rows: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            min_paragraph_chars: DEFAULT_MIN_PARAGRAPH_CHARS,
            max_table_rows: DEFAULT_MAX_TABLE_ROWS,
        }
    }
}

/// A file that was skipped during the build.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Outcome of loading a set of files.
#[derive(Debug, Default)]
pub struct CorpusLoad {
    pub chunks: Vec<Chunk>,
    pub failures: Vec<LoadFailure>,
    pub files_loaded: usize,
}

/// Lists recognized files in `dir` (non-recursive) in processing order.
///
/// A missing directory is an empty corpus, not an error.
pub fn scan_directory(dir: &Path) -> Vec<(PathBuf, ChunkKind)> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        warn!("data directory {} does not exist", dir.display());
        return files;
    }

    let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
    let matches = match glob::glob(&pattern) {
        Ok(m) => m,
        Err(e) => {
            warn!("invalid glob pattern {pattern}: {e}");
            return files;
        }
    };
    let mut found: Vec<(PathBuf, ChunkKind)> = matches
        .flatten()
        .filter(|p| p.is_file())
        .filter_map(|p| ChunkKind::from_path(&p).map(|kind| (p, kind)))
        .collect();
    found.sort_by(|a, b| a.0.cmp(&b.0));

    for kind in ChunkKind::ALL {
        files.extend(found.iter().filter(|(_, k)| *k == kind).cloned());
    }

    files
}

/// Loads every file in order, skipping (and recording) the ones that fail.
pub fn load_files(
    files: &[(PathBuf, ChunkKind)],
    options: &IngestOptions,
    decoder: &dyn DocumentDecoder,
) -> CorpusLoad {
    let mut load = CorpusLoad::default();

    for (path, kind) in files {
        match loaders::load_file(path, *kind, options, decoder) {
            Ok(chunks) => {
                debug!("loaded {} chunks from {}", chunks.len(), path.display());
                load.files_loaded += 1;
                load.chunks.extend(chunks);
            }
            Err(error) => {
                warn!("skipping {}: {error}", path.display());
                load.failures.push(LoadFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    load
}

/// Scans `dir` and loads everything it recognizes.
pub fn load_directory(
    dir: &Path,
    options: &IngestOptions,
    decoder: &dyn DocumentDecoder,
) -> CorpusLoad {
    let files = scan_directory(dir);
    let load = load_files(&files, options, decoder);
    info!(
        "loaded {} chunks from {} files in {} ({} skipped)",
        load.chunks.len(),
        load.files_loaded,
        dir.display(),
        load.failures.len()
    );
    load
}
