//! Build-once, in-memory retriever over a data directory.
//!
//! The retriever is constructed once by the composition root and is
//! immutable afterwards; queries take `&self` and can run concurrently.
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::decoder::DocumentDecoder;
use crate::index::{SparseVector, TfidfVectorizer, VectorizerParams};
use crate::ingest::{self, Chunk, IngestOptions, LoadFailure};

/// Fitted in place of the corpus when no chunks were loaded.
const EMPTY_CORPUS_PLACEHOLDER: &str = "(empty corpus)";

/// A ranked chunk with its cosine similarity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    pub chunk: &'a Chunk,
    pub score: f64,
}

pub struct Retriever {
    chunks: Vec<Chunk>,
    vectorizer: TfidfVectorizer,
    matrix: Vec<SparseVector>,
    failures: Vec<LoadFailure>,
    indexed_at: DateTime<Utc>,
}

impl Retriever {
    /// Loads every recognized file in `data_dir` and fits the vector space.
    ///
    /// Never fails: unreadable files are skipped (see [`Retriever::failures`])
    /// and an empty directory produces an empty retriever.
    pub fn build(
        data_dir: &Path,
        options: &IngestOptions,
        params: &VectorizerParams,
        decoder: &dyn DocumentDecoder,
    ) -> Self {
        let load = ingest::load_directory(data_dir, options, decoder);
        let mut retriever = Self::from_chunks(load.chunks, params);
        retriever.failures = load.failures;
        info!(
            "retriever ready with {} chunks from {}",
            retriever.chunk_count(),
            data_dir.display()
        );
        retriever
    }

    /// Fits the vector space over already-loaded chunks, in the given order.
    pub fn from_chunks(chunks: Vec<Chunk>, params: &VectorizerParams) -> Self {
        let mut vectorizer = TfidfVectorizer::new(*params);
        let matrix = if chunks.is_empty() {
            // Fit on a placeholder so the vector space always exists; the
            // resulting row is not part of the corpus.
            vectorizer.fit_transform(&[EMPTY_CORPUS_PLACEHOLDER]);
            Vec::new()
        } else {
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            vectorizer.fit_transform(&texts)
        };

        Self {
            chunks,
            vectorizer,
            matrix,
            failures: Vec::new(),
            indexed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    #[must_use]
    pub fn chunk(&self, id: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    /// Files skipped during the build.
    #[must_use]
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    #[must_use]
    pub fn indexed_at(&self) -> DateTime<Utc> {
        self.indexed_at
    }

    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer.vocabulary_len()
    }

    /// Ranks every chunk against `question` and returns the best `top_k`
    /// (at least one). Ties keep corpus order. An empty corpus returns no
    /// hits; telling that apart from a real answer is the caller's job.
    pub fn query(&self, question: &str, top_k: usize) -> Vec<Hit<'_>> {
        if self.chunks.is_empty() {
            return Vec::new();
        }

        let q = self.vectorizer.transform(question);
        let mut hits: Vec<Hit<'_>> = self
            .chunks
            .iter()
            .zip(&self.matrix)
            .map(|(chunk, row)| Hit {
                chunk,
                score: q.dot(row),
            })
            .collect();

        // Stable sort: equal scores stay in corpus order
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k.max(1));
        hits
    }
}
