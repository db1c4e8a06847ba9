//! # docqa — local document question answering
//!
//! Indexes plain text, PDF and CSV files from one data directory into an
//! in-memory TF-IDF space and answers free-text questions with the most
//! similar passages.
//!
//! ## Architecture
//!
//! - **[`config`]** — JSON configuration loading and validation
//! - **[`decoder`]** — File decoding seam (text, PDF pages, CSV rows)
//! - **[`ingest`]** — Normalization, paragraph segmentation, per-format loaders
//! - **[`index`]** — Stop words and the TF-IDF vectorizer
//! - **[`retriever`]** — Build-once corpus index and cosine ranking
//! - **[`highlight`]** — HTML-safe excerpts with `<mark>`ed query words
//! - **[`qa`]** — Validated `ask`/`ping` service handed to the CLI and MCP server
//! - **[`mcp`]** — MCP server (stdio transport via rmcp)

pub mod config;
pub mod decoder;
pub mod highlight;
pub mod index;
pub mod ingest;
pub mod mcp;
pub mod qa;
pub mod retriever;
