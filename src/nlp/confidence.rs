//! Acceptance gate on match-method confidence.

use crate::nlp::status::ClassifiedMention;

/// Mentions below this base confidence are dropped before mapping.
pub const MIN_CONFIDENCE: f64 = 0.95;

pub fn filter_confident(mentions: Vec<ClassifiedMention>) -> Vec<ClassifiedMention> {
    mentions
        .into_iter()
        .filter(|classified| classified.mention.base_confidence >= MIN_CONFIDENCE)
        .collect()
}
