//! Context vocabulary and mention-anchored regex templates.
//!
//! Templates contain a `{med}` placeholder that is replaced by the escaped,
//! folded surface text of the mention under inspection.

use regex::Regex;

use crate::error::{ExtractError, Result};

const MED: &str = "{med}";

pub const TREATMENT_FAILURE: &[&str] = &[
    r"no\s+improvement\s+with\s+\w*\s*{med}",
    r"no\s+response\s+to\s+\w*\s*{med}",
    r"ineffective\s+\w*\s*{med}",
    r"not\s+working\s+\w*\s*{med}",
    r"failed\s+\w*\s*{med}",
    r"no\s+benefit\s+(from|with)\s+\w*\s*{med}",
    r"minimal\s+improvement\s+with\s+\w*\s*{med}",
    r"poor\s+response\s+to\s+\w*\s*{med}",
];

pub const STRONG_CONTINUATION: &[&str] = &[
    r"maintain\s+(his|her|their|the)?\s*\w*\s*{med}",
    r"continue\s+(his|her|their|the)?\s*\w*\s*{med}",
    r"continuing\s+(his|her|their|the)?\s*\w*\s*{med}",
    r"keep\s+(him|her|them|patient)?\s*on\s*\w*\s*{med}",
    r"remain\s+on\s+\w*\s*{med}",
    r"stay\s+on\s+\w*\s*{med}",
];

pub const WIDE_CONTINUATION: &[&str] = &[
    r"maintain.*?{med}",
    r"having.*?maintain.*?{med}",
    r"continue.*?{med}",
];

pub const CURRENT_USE: &[&str] = &[
    r"(current|currently|taking|on)\s+\w*\s*{med}",
    r"continue\s+{med}",
    r"refill\s+{med}",
    r"maintain\s+{med}",
    r"high\s+dose.*?{med}",
    r"still\s+(on|taking|with).*?{med}",
];

pub const DOSE_CHANGE: &[&str] = &[
    r"(increase|decrease|adjust|titrate|change\s+dose|modify\s+dose|raise|lower)\s+\w*\s*{med}",
    r"increase\s+{med}",
    r"decrease\s+{med}",
    r"adjust\s+{med}",
    r"titrate\s+{med}",
    r"escalate\s+{med}",
    r"reduce\s+{med}",
    r"continue\s+{med}",
    r"refill\s+{med}",
    r"maintain\s+{med}",
];

pub const NEGATIVE_EVIDENCE: &[&str] = &[
    // past tense
    r"took\s+\w*\s*{med}",
    r"was\s+taking\s+\w*\s*{med}",
    r"had\s+taken\s+\w*\s*{med}",
    r"has\s+taken\s+\w*\s*{med}",
    // duration-limited past use
    r"took\s+\w*\s*{med}\s+for\s+\d+",
    r"was\s+on\s+\w*\s*{med}\s+for\s+\d+",
    r"taking\s+\w*\s*{med}\s+for\s+\d+\s+(months?|weeks?|days?)",
    r"had\s+been\s+\w*\s*{med}\s+for\s+\d+\s+(months?|weeks?|days?)",
    r"(was|were)\s+(on|taking|prescribed)\s+\w*\s*{med}",
    r"had\s+(been\s+)?(taking|on|prescribed)\s+\w*\s*{med}",
    r"used\s+to\s+(take|be\s+on)\s+\w*\s*{med}",
    r"previously\s+(took|taking|on|prescribed)\s+\w*\s*{med}",
    r"formerly\s+(took|taking|on)\s+\w*\s*{med}",
    // discontinuation
    r"(discontinued|stopped|ceased|quit|ended)\s+\w*\s*{med}",
    r"no\s+longer\s+(taking|on)\s+\w*\s*{med}",
    r"came\s+off\s+(of\s+)?\w*\s*{med}",
    r"weaned\s+off\s+(of\s+)?\w*\s*{med}",
    r"tapered\s+off\s+(of\s+)?\w*\s*{med}",
    // refusal and avoidance
    r"(refusing|refused|denies|declines)\s+\w*\s*{med}",
    r"wants?\s+to\s+(remain\s+)?off\s+(of\s+)?\w*\s*{med}",
    r"(avoid|avoiding|stayed\s+away\s+from)\s+\w*\s*{med}",
    r"not\s+(currently\s+)?(taking|on)\s+\w*\s*{med}",
    r"off\s+(of\s+)?\w*\s*{med}",
    // allergy and contraindication
    r"(allergic|allergy)\s+to\s+\w*\s*{med}",
    r"contraindicated\s+\w*\s*{med}",
    r"intolerant\s+to\s+\w*\s*{med}",
    r"adverse\s+reaction\s+to\s+\w*\s*{med}",
    // temporal distancing
    r"in\s+the\s+past\s+\w*\s*{med}",
    r"historically\s+\w*\s*{med}",
    r"prior\s+to\s+\w*\s*{med}",
    r"before\s+\w*\s*{med}",
    // trials
    r"tried\s+\w*\s*{med}",
    r"attempted\s+\w*\s*{med}",
    r"briefly\s+(took|on)\s+\w*\s*{med}",
    r"short\s+trial\s+of\s+\w*\s*{med}",
    // failed therapy
    r"failed\s+\w*\s*{med}",
    r"ineffective\s+\w*\s*{med}",
    r"did\s+not\s+tolerate\s+\w*\s*{med}",
    r"could\s+not\s+tolerate\s+\w*\s*{med}",
    // switches
    r"(his|her|their|the)?\s*{med}\s+was\s+(changed|switched)\s+to",
    r"change\s+(from\s+)?{med}\s+to",
    r"switch\s+(from\s+)?{med}\s+to",
    r"replaced\s+{med}\s+with",
    r"substitute\s+{med}\s+with",
    r"transition\s+(from\s+)?{med}\s+to",
    // enumerations
    r"including\s+\w*\s*{med}",
    r"such\s+as\s+\w*\s*{med}",
    r"like\s+\w*\s*{med}",
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "was changed to",
    "was switched to",
    "changed from",
    "switched from",
    "replaced with",
    "substituted with",
    "transitioned to",
    "no improvement with",
    "no response to",
    "not working",
    "failed",
    "ineffective",
    "no benefit from",
    "poor response",
    "minimal improvement",
    "not helping",
    "no longer",
    "stopped",
    "completed",
    "discontinued",
    "not taking",
    "previously took",
    "allergic",
    "allergy",
    "refused",
    "denies",
    "avoid",
    "contraindicated",
    "was on",
    "had been taking",
    "used to take",
    "wants to remain off",
    "came off",
    "weaned off",
    "tapered off",
    "tried",
    "intolerant",
    "adverse reaction",
    "briefly took",
    "short trial",
    "historically",
    "in the past",
    "prior to",
    "before",
    "formerly",
    "attempted",
    "could not tolerate",
    "no need",
    "dc",
    "previously",
];

pub const DISCONTINUATION_HEADERS: &[&str] = &[
    "medications discontinued during this encounter",
    "discontinued medications",
    "stopped medications",
];

pub const HISTORY_HEADERS: &[&str] = &[
    "past medical history",
    "past medications",
    "previous medications",
    "history of present illness",
    "medications previously taken",
    "previous drug history",
    "prior medications",
    "past drug therapy",
];

pub const TABLE_INDICATORS: &[&str] = &[
    "<table",
    "</table>",
    "<tr>",
    "</tr>",
    "<td>",
    "</td>",
    "medications:",
    "current medications",
    "medication list",
    "sig (take, route, frequency, duration)",
    "status",
    "active",
];

pub const TABLE_NON_ACTIVE_MARKERS: &[&str] =
    &["not-taking", "discontinued", "completed", "stopped"];

pub const DOSE_INCREASE_KEYWORDS: &[&str] =
    &["increase", "start", "begin", "new", "change to", "adjust to"];

pub const DOSE_STOP_KEYWORDS: &[&str] = &["stop", "discontinue", "old", "previous"];

/// Wide-window word whose presence vetoes the discontinuation-section rule.
pub const MAINTAIN_WORD: &str = "maintain";

/// True when any keyword occurs in the (folded) haystack.
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

/// Compiled, case-insensitive alternation of one template group for one mention.
#[derive(Debug, Clone)]
pub struct PatternSet(Regex);

impl PatternSet {
    pub fn compile(templates: &[&str], mention: &str) -> Result<Self> {
        let escaped = regex::escape(mention);
        let alternation = templates
            .iter()
            .map(|template| format!("(?:{})", template.replace(MED, &escaped)))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i){alternation}"))
            .map(Self)
            .map_err(|source| ExtractError::Pattern {
                mention: mention.to_string(),
                source,
            })
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

/// Every template group compiled for a single surface text.
#[derive(Debug, Clone)]
pub struct MentionPatterns {
    pub treatment_failure: PatternSet,
    pub strong_continuation: PatternSet,
    pub wide_continuation: PatternSet,
    pub current_use: PatternSet,
    pub dose_change: PatternSet,
    pub negative_evidence: PatternSet,
}

impl MentionPatterns {
    /// `mention` should be the folded surface text.
    pub fn compile(mention: &str) -> Result<Self> {
        Ok(Self {
            treatment_failure: PatternSet::compile(TREATMENT_FAILURE, mention)?,
            strong_continuation: PatternSet::compile(STRONG_CONTINUATION, mention)?,
            wide_continuation: PatternSet::compile(WIDE_CONTINUATION, mention)?,
            current_use: PatternSet::compile(CURRENT_USE, mention)?,
            dose_change: PatternSet::compile(DOSE_CHANGE, mention)?,
            negative_evidence: PatternSet::compile(NEGATIVE_EVIDENCE, mention)?,
        })
    }
}
