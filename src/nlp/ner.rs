//! Dictionary-based medication NER over the concept lexicon.

use serde::{Deserialize, Serialize};

use crate::{data::lexicon::Lexicon, nlp::text::fold_case};

/// Confidence assigned to an exact generic-name hit.
pub const GENERIC_CONFIDENCE: f64 = 0.98;
/// Confidence assigned to a brand-synonym hit.
pub const BRAND_CONFIDENCE: f64 = 0.96;

/// Which lexicon table produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Generic,
    Brand,
}

impl MatchMethod {
    pub fn base_confidence(self) -> f64 {
        match self {
            Self::Generic => GENERIC_CONFIDENCE,
            Self::Brand => BRAND_CONFIDENCE,
        }
    }
}

/// Raw medication mention with byte offsets into the source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateMention {
    /// Exact source substring, original casing.
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub method: MatchMethod,
    pub base_confidence: f64,
    /// Generic name the surface text resolves toward.
    pub matched_generic: String,
}

/// Trait for mention matchers.
pub trait Ner: Send + Sync {
    fn extract(&self, text: &str) -> Vec<CandidateMention>;
}

/// Substring matcher over generic names and brand synonyms.
///
/// Word boundaries are not enforced: a short generic name inside a longer
/// unrelated word still matches.
pub struct LexiconNer<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> LexiconNer<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Generic-name hits, grouped per lexicon key in lexicon order.
    pub fn generic_mentions(&self, text: &str, folded: &str) -> Vec<CandidateMention> {
        self.lexicon
            .entries()
            .flat_map(|entry| {
                find_terms(
                    text,
                    folded,
                    &entry.generic_name,
                    &entry.generic_name,
                    MatchMethod::Generic,
                )
            })
            .collect()
    }

    /// Brand-synonym hits, grouped per brand in brand-index order.
    pub fn brand_mentions(&self, text: &str, folded: &str) -> Vec<CandidateMention> {
        self.lexicon
            .brands()
            .flat_map(|(brand, generic)| {
                find_terms(text, folded, brand, generic, MatchMethod::Brand)
            })
            .collect()
    }
}

impl Ner for LexiconNer<'_> {
    fn extract(&self, text: &str) -> Vec<CandidateMention> {
        let folded = fold_case(text);
        let mut spans = self.generic_mentions(text, &folded);
        spans.extend(self.brand_mentions(text, &folded));
        spans
    }
}

/// Leftmost, non-overlapping forward scan for one folded term.
fn find_terms(
    text: &str,
    folded: &str,
    term: &str,
    generic: &str,
    method: MatchMethod,
) -> Vec<CandidateMention> {
    let mut spans = Vec::new();
    if term.is_empty() {
        return spans;
    }
    let mut start_pos = 0;
    while let Some(pos) = folded[start_pos..].find(term) {
        let start = start_pos + pos;
        let end = start + term.len();
        spans.push(CandidateMention {
            text: text[start..end].to_string(),
            start,
            end,
            method,
            base_confidence: method.base_confidence(),
            matched_generic: generic.to_string(),
        });
        start_pos = end;
    }
    spans
}
