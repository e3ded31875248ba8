//! Per-document and batch orchestration.
//!
//! Read → match → deduplicate and classify → filter → map → emit. Documents
//! share nothing but the read-only lexicon, so a batch fans out across
//! blocking worker threads.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    config::Settings,
    data::{
        documents,
        lexicon::Lexicon,
        normalize::{self, MappedMedication},
    },
    error::Result,
    nlp::{self, confidence::MIN_CONFIDENCE, status::StatusClassifier},
};

/// Output record for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentResult {
    pub document_id: String,
    pub medications: Vec<MappedMedication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentResult {
    pub fn failed(document_id: String, error: impl ToString) -> Self {
        Self {
            document_id,
            medications: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn mapped_count(&self) -> usize {
        self.medications.iter().filter(|m| m.is_mapped()).count()
    }
}

/// Aggregate counts for a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    pub mentions_found: usize,
    pub mentions_mapped: usize,
    pub confidence_threshold: f64,
    pub generated_at: DateTime<Utc>,
}

impl BatchSummary {
    pub fn from_results(results: &[DocumentResult]) -> Self {
        Self {
            files_processed: results.len(),
            files_failed: results.iter().filter(|r| !r.is_ok()).count(),
            mentions_found: results.iter().map(|r| r.medications.len()).sum(),
            mentions_mapped: results.iter().map(DocumentResult::mapped_count).sum(),
            confidence_threshold: MIN_CONFIDENCE,
            generated_at: Utc::now(),
        }
    }
}

/// Extraction engine owning the lexicon and the rule cascade.
pub struct Pipeline {
    lexicon: Lexicon,
    classifier: StatusClassifier,
}

impl Pipeline {
    pub fn new(lexicon: Lexicon) -> Self {
        Self::with_classifier(lexicon, StatusClassifier::default())
    }

    /// Use a custom rule cascade instead of the default one.
    pub fn with_classifier(lexicon: Lexicon, classifier: StatusClassifier) -> Self {
        Self {
            lexicon,
            classifier,
        }
    }

    /// Load the configured lexicon, falling back to an empty one.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Lexicon::load_or_empty(&settings.lexicon_path))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn run(&self, text: &str) -> Result<Vec<MappedMedication>> {
        let accepted = nlp::extract_mentions(&self.lexicon, &self.classifier, text)?;
        Ok(normalize::map_all(&self.lexicon, text, accepted))
    }

    /// Process in-memory text. Failures land in `DocumentResult::error`.
    pub fn process_text(&self, document_id: &str, text: &str) -> DocumentResult {
        match self.run(text) {
            Ok(medications) => DocumentResult {
                document_id: document_id.to_string(),
                medications,
                error: None,
            },
            Err(err) => {
                warn!(document_id, %err, "document processing failed");
                DocumentResult::failed(document_id.to_string(), err)
            }
        }
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn process_file(&self, path: &Path) -> DocumentResult {
        let document_id = documents::document_id(path);
        match documents::read_document(path) {
            Ok(text) => self.process_text(&document_id, &text),
            Err(err) => {
                warn!(%err, "could not read document");
                DocumentResult::failed(document_id, err)
            }
        }
    }
}

/// Process `paths` on up to `workers` blocking threads. Results keep input order.
pub async fn process_batch(
    pipeline: Arc<Pipeline>,
    paths: Vec<PathBuf>,
    workers: usize,
) -> (Vec<DocumentResult>, BatchSummary) {
    let results: Vec<DocumentResult> = stream::iter(paths)
        .map(|path| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                let document_id = documents::document_id(&path);
                tokio::task::spawn_blocking(move || pipeline.process_file(&path))
                    .await
                    .unwrap_or_else(|err| DocumentResult::failed(document_id, err))
            }
        })
        .buffered(workers.max(1))
        .collect()
        .await;

    let summary = BatchSummary::from_results(&results);
    info!(
        files = summary.files_processed,
        failed = summary.files_failed,
        mentions = summary.mentions_found,
        mapped = summary.mentions_mapped,
        "batch complete"
    );
    (results, summary)
}
