//! Active/non-active status classification.
//!
//! Each mention is run through an ordered cascade of rules. The first rule that
//! returns a verdict wins; mentions no rule claims default to active. Rule
//! order is significant: treatment failure and explicit continuation outrank
//! section headings, which in turn outrank the generic negative-evidence
//! catalogue.

use std::collections::{hash_map::Entry, HashMap};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::Result,
    nlp::{
        ner::CandidateMention,
        patterns::{self, contains_any, MentionPatterns},
        text::{fold_case, preceding, window},
    },
};

/// Characters inspected on each side of a mention by most rules.
pub const NARROW_WINDOW: usize = 150;
/// Characters on each side used by the dose-adjustment rule.
pub const DOSE_WINDOW: usize = 300;
/// Characters on each side for loose continuation, and before the mention for section headings.
pub const WIDE_WINDOW: usize = 500;
/// Characters before the mention searched for dose-change keywords.
pub const LEAD_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "non-active")]
    NonActive,
}

/// Candidate mention with its status and the rule that decided it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMention {
    pub mention: CandidateMention,
    pub status: ActiveStatus,
    /// `None` when no rule fired and the default applied.
    pub rule: Option<&'static str>,
}

/// Text surrounding one mention, pre-sliced for every rule.
pub struct MentionContext<'a> {
    pub patterns: &'a MentionPatterns,
    /// ±150 characters.
    pub narrow: String,
    /// ±300 characters.
    pub dose: String,
    /// ±500 characters.
    pub wide: String,
    /// 500 characters before the mention.
    pub section: String,
    /// 100 characters before the mention.
    pub lead: String,
}

impl<'a> MentionContext<'a> {
    pub fn new(text: &str, start: usize, end: usize, patterns: &'a MentionPatterns) -> Self {
        Self {
            patterns,
            narrow: window(text, start, end, NARROW_WINDOW, NARROW_WINDOW),
            dose: window(text, start, end, DOSE_WINDOW, DOSE_WINDOW),
            wide: window(text, start, end, WIDE_WINDOW, WIDE_WINDOW),
            section: preceding(text, start, WIDE_WINDOW),
            lead: preceding(text, start, LEAD_WINDOW),
        }
    }
}

/// One tier of the cascade.
pub trait StatusRule: Send + Sync {
    fn name(&self) -> &'static str;
    /// `Some` ends the cascade; `None` defers to the next rule.
    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus>;
}

/// "no improvement with X", "failed X", "poor response to X".
pub struct TreatmentFailure;

impl StatusRule for TreatmentFailure {
    fn name(&self) -> &'static str {
        "treatment_failure"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        ctx.patterns
            .treatment_failure
            .is_match(&ctx.narrow)
            .then_some(ActiveStatus::NonActive)
    }
}

/// "continue X", "maintain her X", "remain on X" close to the mention.
pub struct StrongContinuation;

impl StatusRule for StrongContinuation {
    fn name(&self) -> &'static str {
        "strong_continuation"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        ctx.patterns
            .strong_continuation
            .is_match(&ctx.narrow)
            .then_some(ActiveStatus::Active)
    }
}

/// Continuation vocabulary anywhere ahead of the mention in the wide window.
pub struct WideContinuation;

impl StatusRule for WideContinuation {
    fn name(&self) -> &'static str {
        "wide_continuation"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        ctx.patterns
            .wide_continuation
            .is_match(&ctx.wide)
            .then_some(ActiveStatus::Active)
    }
}

/// Under a "medications discontinued" heading, unless "maintain" appears nearby.
pub struct DiscontinuedSection;

impl StatusRule for DiscontinuedSection {
    fn name(&self) -> &'static str {
        "discontinued_section"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        let under_heading = contains_any(&ctx.section, patterns::DISCONTINUATION_HEADERS);
        (under_heading && !ctx.wide.contains(patterns::MAINTAIN_WORD))
            .then_some(ActiveStatus::NonActive)
    }
}

/// Medication tables and lists are current unless a row is marked otherwise.
pub struct MedicationTable;

impl StatusRule for MedicationTable {
    fn name(&self) -> &'static str {
        "medication_table"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        if !contains_any(&ctx.narrow, patterns::TABLE_INDICATORS) {
            return None;
        }
        if contains_any(&ctx.narrow, patterns::TABLE_NON_ACTIVE_MARKERS) {
            Some(ActiveStatus::NonActive)
        } else {
            Some(ActiveStatus::Active)
        }
    }
}

/// "currently taking X", "refill X", "still on X".
pub struct CurrentUse;

impl StatusRule for CurrentUse {
    fn name(&self) -> &'static str {
        "current_use"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        ctx.patterns
            .current_use
            .is_match(&ctx.narrow)
            .then_some(ActiveStatus::Active)
    }
}

/// Dose changes: the mention after "increase/start/new" is the live dose,
/// the one after "stop/old/previous" is the superseded one.
pub struct DoseAdjustment;

impl StatusRule for DoseAdjustment {
    fn name(&self) -> &'static str {
        "dose_adjustment"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        if !ctx.patterns.dose_change.is_match(&ctx.dose) {
            return None;
        }
        if contains_any(&ctx.lead, patterns::DOSE_INCREASE_KEYWORDS) {
            Some(ActiveStatus::Active)
        } else if contains_any(&ctx.lead, patterns::DOSE_STOP_KEYWORDS) {
            Some(ActiveStatus::NonActive)
        } else {
            None
        }
    }
}

/// Under a past-history heading.
pub struct HistorySection;

impl StatusRule for HistorySection {
    fn name(&self) -> &'static str {
        "history_section"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        contains_any(&ctx.section, patterns::HISTORY_HEADERS).then_some(ActiveStatus::NonActive)
    }
}

/// Past tense, discontinuation, refusal, allergy, trials and switches; then a
/// plain keyword sweep of the narrow window.
pub struct NegativeEvidence;

impl StatusRule for NegativeEvidence {
    fn name(&self) -> &'static str {
        "negative_evidence"
    }

    fn evaluate(&self, ctx: &MentionContext<'_>) -> Option<ActiveStatus> {
        let hit = ctx.patterns.negative_evidence.is_match(&ctx.narrow)
            || contains_any(&ctx.narrow, patterns::NEGATIVE_KEYWORDS);
        hit.then_some(ActiveStatus::NonActive)
    }
}

/// Ordered rule cascade.
pub struct StatusClassifier {
    rules: Vec<Box<dyn StatusRule>>,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new(vec![
            Box::new(TreatmentFailure),
            Box::new(StrongContinuation),
            Box::new(WideContinuation),
            Box::new(DiscontinuedSection),
            Box::new(MedicationTable),
            Box::new(CurrentUse),
            Box::new(DoseAdjustment),
            Box::new(HistorySection),
            Box::new(NegativeEvidence),
        ])
    }
}

impl StatusClassifier {
    pub fn new(rules: Vec<Box<dyn StatusRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// First verdict in rule order, with the deciding rule's name.
    pub fn decide(&self, ctx: &MentionContext<'_>) -> (ActiveStatus, Option<&'static str>) {
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(ctx).map(|status| (status, Some(rule.name()))))
            .unwrap_or((ActiveStatus::Active, None))
    }

    pub fn classify(
        &self,
        text: &str,
        mention: CandidateMention,
        patterns: &MentionPatterns,
    ) -> ClassifiedMention {
        let ctx = MentionContext::new(text, mention.start, mention.end, patterns);
        let (status, rule) = self.decide(&ctx);
        trace!(
            mention = %mention.text,
            start = mention.start,
            ?status,
            ?rule,
            "classified mention"
        );
        ClassifiedMention {
            mention,
            status,
            rule,
        }
    }

    /// Classify every mention of one document. Patterns are compiled once per
    /// distinct folded surface text.
    pub fn classify_all(
        &self,
        text: &str,
        mentions: Vec<CandidateMention>,
    ) -> Result<Vec<ClassifiedMention>> {
        let mut compiled: HashMap<String, MentionPatterns> = HashMap::new();
        let mut out = Vec::with_capacity(mentions.len());
        for mention in mentions {
            let patterns = match compiled.entry(fold_case(&mention.text)) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => {
                    let patterns = MentionPatterns::compile(slot.key())?;
                    slot.insert(patterns)
                }
            };
            out.push(self.classify(text, mention, patterns));
        }
        Ok(out)
    }
}
