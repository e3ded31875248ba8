//! Positional deduplication of candidate mentions.

use std::collections::HashSet;

use crate::nlp::{ner::CandidateMention, text::fold_case};

/// Surface texts this short or shorter are dropped as noise.
pub const MIN_SURFACE_CHARS: usize = 2;

/// Keep the first candidate per `(folded text, start, end)` key, in discovery order.
pub fn dedup_mentions<I>(candidates: I) -> Vec<CandidateMention>
where
    I: IntoIterator<Item = CandidateMention>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|mention| mention.text.chars().count() > MIN_SURFACE_CHARS)
        .filter(|mention| seen.insert((fold_case(&mention.text), mention.start, mention.end)))
        .collect()
}
