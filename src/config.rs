/// Configuration module for docqa.
///
/// Handles loading, validating, and providing default configuration values.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::highlight::DEFAULT_HIGHLIGHT_CHARS;
use crate::index::VectorizerParams;
use crate::ingest::{DEFAULT_MAX_TABLE_ROWS, DEFAULT_MIN_PARAGRAPH_CHARS, IngestOptions};
use crate::qa::QueryLimits;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

// ── Default value functions ──────────────────────────────────────────

fn default_data_dir() -> String {
    "./sample_data".to_string()
}

fn default_min_paragraph_chars() -> usize {
    DEFAULT_MIN_PARAGRAPH_CHARS
}

fn default_max_table_rows() -> usize {
    DEFAULT_MAX_TABLE_ROWS
}

fn default_search_top_k() -> usize {
    3
}

fn default_max_top_k() -> usize {
    10
}

fn default_min_question_chars() -> usize {
    2
}

fn default_highlight_max_chars() -> usize {
    DEFAULT_HIGHLIGHT_CHARS
}

fn default_max_df() -> f64 {
    0.9
}

fn default_min_df() -> usize {
    1
}

fn default_max_ngram() -> usize {
    2
}

fn default_true() -> bool {
    true
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_min_paragraph_chars")]
    pub min_paragraph_chars: usize,

    #[serde(default = "default_max_table_rows")]
    pub max_table_rows: usize,

    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    #[serde(default = "default_min_question_chars")]
    pub min_question_chars: usize,

    #[serde(default = "default_highlight_max_chars")]
    pub highlight_max_chars: usize,

    #[serde(default)]
    pub vectorizer: VectorizerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VectorizerConfig {
    #[serde(default = "default_max_df")]
    pub max_df: f64,

    #[serde(default = "default_min_df")]
    pub min_df: usize,

    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,

    #[serde(default = "default_true")]
    pub stop_words: bool,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            min_paragraph_chars: default_min_paragraph_chars(),
            max_table_rows: default_max_table_rows(),
            search_top_k: default_search_top_k(),
            max_top_k: default_max_top_k(),
            min_question_chars: default_min_question_chars(),
            highlight_max_chars: default_highlight_max_chars(),
            vectorizer: VectorizerConfig::default(),
        }
    }
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_df: default_max_df(),
            min_df: default_min_df(),
            max_ngram: default_max_ngram(),
            stop_words: default_true(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to `"config.json"`.
    /// If the file does not exist, returns a default config and, for the
    /// default path only, writes a template next to it.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            DEFAULT_CONFIG_PATH
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            if path == DEFAULT_CONFIG_PATH {
                match cfg.save(path) {
                    Ok(()) => info!("Generated config template: {path}"),
                    Err(e) => warn!("Failed to generate config template: {e}"),
                }
            }

            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.data_dir.is_empty(), "data_dir must not be empty");
        anyhow::ensure!(self.max_table_rows > 0, "max_table_rows must be positive");
        anyhow::ensure!(self.max_top_k > 0, "max_top_k must be positive");
        anyhow::ensure!(
            (1..=self.max_top_k).contains(&self.search_top_k),
            "search_top_k must be between 1 and max_top_k ({})",
            self.max_top_k
        );
        anyhow::ensure!(
            self.highlight_max_chars > 0,
            "highlight_max_chars must be positive"
        );
        anyhow::ensure!(
            self.vectorizer.max_df > 0.0 && self.vectorizer.max_df <= 1.0,
            "vectorizer.max_df must be in (0, 1]"
        );
        anyhow::ensure!(self.vectorizer.min_df > 0, "vectorizer.min_df must be positive");
        anyhow::ensure!(
            self.vectorizer.max_ngram > 0,
            "vectorizer.max_ngram must be positive"
        );
        Ok(())
    }

    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    #[must_use]
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            min_paragraph_chars: self.min_paragraph_chars,
            max_table_rows: self.max_table_rows,
        }
    }

    #[must_use]
    pub fn query_limits(&self) -> QueryLimits {
        QueryLimits {
            min_question_chars: self.min_question_chars,
            default_top_k: self.search_top_k,
            max_top_k: self.max_top_k,
            highlight_max_chars: self.highlight_max_chars,
        }
    }

    #[must_use]
    pub fn vectorizer_params(&self) -> VectorizerParams {
        VectorizerParams {
            max_df: self.vectorizer.max_df,
            min_df: self.vectorizer.min_df,
            max_ngram: self.vectorizer.max_ngram,
            stop_words: self.vectorizer.stop_words,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_dir, "./sample_data");
        assert_eq!(config.min_paragraph_chars, 40);
        assert_eq!(config.max_table_rows, 2000);
        assert_eq!(config.search_top_k, 3);
        assert_eq!(config.max_top_k, 10);
        assert_eq!(config.highlight_max_chars, 420);
        assert_eq!(config.vectorizer.max_df, 0.9);
        assert_eq!(config.vectorizer.max_ngram, 2);
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{"data_dir": "./docs", "vectorizer": {"max_ngram": 1}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.data_dir, "./docs");
        assert_eq!(config.vectorizer.max_ngram, 1);
        // Other fields should have defaults
        assert_eq!(config.search_top_k, 3);
        assert_eq!(config.vectorizer.min_df, 1);
        assert!(config.vectorizer.stop_words);
    }

    #[test]
    fn test_validate_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_top_k() {
        let mut config = Config::default();
        config.search_top_k = 11;
        assert!(config.validate().is_err());
        config.search_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_max_df() {
        let mut config = Config::default();
        config.vectorizer.max_df = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_and_invalid() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let cfg = Config::load(missing.to_str().unwrap()).unwrap();
        assert_eq!(cfg.search_top_k, 3);
        // Only the default path gets a template
        assert!(!missing.exists());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let cfg = Config::load(bad.to_str().unwrap()).unwrap();
        assert_eq!(cfg.data_dir, "./sample_data");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.data_dir = "/srv/docs".to_string();
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.data_dir, "/srv/docs");
    }

    #[test]
    fn test_derived_settings() {
        let config = Config::default();
        assert_eq!(config.ingest_options(), IngestOptions::default());
        assert_eq!(config.query_limits(), QueryLimits::default());
        assert_eq!(config.vectorizer_params(), VectorizerParams::default());
    }
}
