//! Runtime configuration utilities for medication-extractor.

use std::{env, path::PathBuf};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// CSV concept table (generic, RxCUI, term type, brand columns).
    pub lexicon_path: PathBuf,
    /// Root folder for per-document JSON results.
    pub outputs_dir: PathBuf,
    /// File extensions picked up when the input is a directory.
    pub document_extensions: Vec<String>,
    /// Documents processed concurrently in batch mode.
    pub workers: usize,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let lexicon_path = env::var("LEXICON_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("Medication-label-set.csv"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let document_extensions = env::var("DOCUMENT_EXTENSIONS")
            .map(|raw| parse_extensions(&raw))
            .ok()
            .filter(|exts| !exts.is_empty())
            .unwrap_or_else(|| parse_extensions("html,htm,txt"));
        let workers = env::var("EXTRACT_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_workers)
            .max(1);
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            lexicon_path,
            outputs_dir,
            document_extensions,
            workers,
            log_level,
        })
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
