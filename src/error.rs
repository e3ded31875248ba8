//! Typed errors for lexicon loading and per-document extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for per-document extraction.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Failures while opening or reading the concept lexicon source.
#[derive(Error, Debug)]
pub enum LexiconError {
    /// Lexicon file could not be opened.
    #[error("cannot open lexicon {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV header or framing error.
    #[error("malformed lexicon source: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures that abort processing of a single document.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Document bytes could not be read as UTF-8 text.
    #[error("failed to read document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A context pattern built around a mention failed to compile.
    #[error("invalid context pattern for {mention:?}: {source}")]
    Pattern {
        mention: String,
        #[source]
        source: regex::Error,
    },

    /// Result could not be persisted.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
