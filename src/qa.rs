//! Question answering over a built [`Retriever`].
//!
//! Keeps three outcomes apart for callers: invalid input ([`QaError::InvalidQuery`]),
//! nothing indexed ([`QaError::EmptyCorpus`]), and a normal answer whose
//! passages may all score 0 when nothing matched.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::highlight::{DEFAULT_HIGHLIGHT_CHARS, highlight};
use crate::retriever::Retriever;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QaError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("corpus is empty; put files in {} and restart", .data_dir.display())]
    EmptyCorpus { data_dir: PathBuf },
}

/// Bounds applied to incoming questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub min_question_chars: usize,
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub highlight_max_chars: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            min_question_chars: 2,
            default_top_k: 3,
            max_top_k: 10,
            highlight_max_chars: DEFAULT_HIGHLIGHT_CHARS,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Passage {
    pub doc_id: String,
    pub source_path: String,
    pub score: f64,
    pub text: String,
    pub highlighted: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AskResponse {
    pub question: String,
    pub answers: Vec<Passage>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PingStatus {
    pub status: &'static str,
    pub chunks_indexed: usize,
    pub indexed_at: DateTime<Utc>,
}

/// Rounds a similarity score to six decimal places for presentation.
fn round_score(score: f64) -> f64 {
    (score * 1e6).round() / 1e6
}

pub struct QaService {
    retriever: Retriever,
    limits: QueryLimits,
    data_dir: PathBuf,
}

impl QaService {
    pub fn new(retriever: Retriever, limits: QueryLimits, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            retriever,
            limits,
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.retriever.chunk_count()
    }

    pub fn ping(&self) -> PingStatus {
        PingStatus {
            status: "ok",
            chunks_indexed: self.retriever.chunk_count(),
            indexed_at: self.retriever.indexed_at(),
        }
    }

    fn validate(&self, question: &str, top_k: Option<usize>) -> Result<usize, QaError> {
        let len = question.chars().count();
        if len < self.limits.min_question_chars {
            return Err(QaError::InvalidQuery(format!(
                "question must be at least {} characters, got {len}",
                self.limits.min_question_chars
            )));
        }

        let top_k = top_k.unwrap_or(self.limits.default_top_k);
        if top_k < 1 || top_k > self.limits.max_top_k {
            return Err(QaError::InvalidQuery(format!(
                "top_k must be between 1 and {}, got {top_k}",
                self.limits.max_top_k
            )));
        }
        Ok(top_k)
    }

    /// Answers `question` with up to `top_k` ranked passages.
    pub fn ask(&self, question: &str, top_k: Option<usize>) -> Result<AskResponse, QaError> {
        let top_k = self.validate(question, top_k)?;
        if self.retriever.is_empty() {
            return Err(QaError::EmptyCorpus {
                data_dir: self.data_dir.clone(),
            });
        }

        let answers = self
            .retriever
            .query(question, top_k)
            .into_iter()
            .map(|hit| Passage {
                doc_id: hit.chunk.id.clone(),
                source_path: hit.chunk.source_path.clone(),
                score: round_score(hit.score),
                text: hit.chunk.text.clone(),
                highlighted: highlight(&hit.chunk.text, question, self.limits.highlight_max_chars),
            })
            .collect();

        Ok(AskResponse {
            question: question.to_string(),
            answers,
        })
    }
}
