//! Mention matching and contextual status tagging.

pub mod confidence;
pub mod dedup;
pub mod ner;
pub mod patterns;
pub mod status;
pub mod text;

use tracing::debug;

use crate::{
    data::lexicon::Lexicon,
    error::Result,
    nlp::{
        ner::{LexiconNer, Ner},
        status::{ClassifiedMention, StatusClassifier},
    },
};

/// Match, deduplicate, classify and gate the mentions of one document.
pub fn extract_mentions(
    lexicon: &Lexicon,
    classifier: &StatusClassifier,
    text: &str,
) -> Result<Vec<ClassifiedMention>> {
    let candidates = LexiconNer::new(lexicon).extract(text);
    let found = candidates.len();
    let unique = dedup::dedup_mentions(candidates);
    let classified = classifier.classify_all(text, unique)?;
    let accepted = confidence::filter_confident(classified);
    debug!(found, accepted = accepted.len(), "extracted mentions");
    Ok(accepted)
}
