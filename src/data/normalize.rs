//! Terminology normalisation: mention text to concept identifier.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    data::lexicon::{Lexicon, LexiconEntry},
    nlp::{
        status::{ActiveStatus, ClassifiedMention},
        text::{fold_case, CharOffsets},
    },
};

/// Flag attached to mentions the lexicon cannot resolve.
pub const UNRECOGNIZED_FLAG: &str = "unrecognized_medication";

/// Mapping confidence for a direct generic-name hit.
pub const GENERIC_MAPPING_CONFIDENCE: f64 = 1.0;
/// Mapping confidence for a brand resolved through its generic.
pub const BRAND_MAPPING_CONFIDENCE: f64 = 0.96;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMethod {
    GenericName,
    BrandName,
    NoMatch,
}

impl MappingMethod {
    pub fn confidence(self) -> f64 {
        match self {
            Self::GenericName => GENERIC_MAPPING_CONFIDENCE,
            Self::BrandName => BRAND_MAPPING_CONFIDENCE,
            Self::NoMatch => 0.0,
        }
    }
}

/// Outcome of looking a surface text up in the lexicon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptMatch {
    pub concept_id: Option<String>,
    pub normalized_name: String,
    pub concept_type: Option<String>,
    pub mapping_method: MappingMethod,
    pub mapping_confidence: f64,
    pub flag: Option<String>,
}

impl ConceptMatch {
    fn resolved(entry: &LexiconEntry, normalized_name: String, method: MappingMethod) -> Self {
        Self {
            concept_id: entry.concept_id.clone(),
            normalized_name,
            concept_type: entry.concept_type.clone(),
            mapping_method: method,
            mapping_confidence: method.confidence(),
            flag: None,
        }
    }

    fn unmatched(surface: &str) -> Self {
        Self {
            concept_id: None,
            normalized_name: surface.to_string(),
            concept_type: None,
            mapping_method: MappingMethod::NoMatch,
            mapping_confidence: MappingMethod::NoMatch.confidence(),
            flag: Some(UNRECOGNIZED_FLAG.to_string()),
        }
    }
}

/// Final per-mention output record. Offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedMedication {
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub confidence: f64,
    pub active_status: ActiveStatus,
    pub concept_id: Option<String>,
    pub normalized_name: String,
    pub concept_type: Option<String>,
    pub mapping_method: MappingMethod,
    pub mapping_confidence: f64,
    pub flag: Option<String>,
}

impl MappedMedication {
    pub fn is_mapped(&self) -> bool {
        self.concept_id.is_some()
    }
}

/// Generic lookup, then brand-to-generic, else `no_match`. Never fails.
pub fn lookup(lexicon: &Lexicon, surface: &str) -> ConceptMatch {
    let key = fold_case(surface.trim());
    if let Some(entry) = lexicon.generic(&key) {
        return ConceptMatch::resolved(entry, key, MappingMethod::GenericName);
    }
    if let Some(entry) = lexicon.brand(&key) {
        return ConceptMatch::resolved(
            entry,
            entry.generic_name.clone(),
            MappingMethod::BrandName,
        );
    }
    debug!(%surface, "no lexicon concept for mention");
    ConceptMatch::unmatched(surface)
}

/// Map one classified mention; exactly one record per input.
pub fn map_mention(
    lexicon: &Lexicon,
    offsets: &CharOffsets,
    classified: ClassifiedMention,
) -> MappedMedication {
    let ClassifiedMention {
        mention, status, ..
    } = classified;
    let concept = lookup(lexicon, &mention.text);
    MappedMedication {
        text: mention.text,
        start_offset: offsets.char_offset(mention.start),
        end_offset: offsets.char_offset(mention.end),
        confidence: mention.base_confidence,
        active_status: status,
        concept_id: concept.concept_id,
        normalized_name: concept.normalized_name,
        concept_type: concept.concept_type,
        mapping_method: concept.mapping_method,
        mapping_confidence: concept.mapping_confidence,
        flag: concept.flag,
    }
}

/// Map every mention of `text`, translating spans to character offsets.
pub fn map_all(
    lexicon: &Lexicon,
    text: &str,
    mentions: Vec<ClassifiedMention>,
) -> Vec<MappedMedication> {
    let offsets = CharOffsets::new(text);
    mentions
        .into_iter()
        .map(|mention| map_mention(lexicon, &offsets, mention))
        .collect()
}
