//! Medication extraction from clinical free text.
//!
//! A read-only concept lexicon drives substring matching of generic and brand
//! names; each mention is tagged active or non-active from its surrounding
//! text and mapped to a concept identifier.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
pub mod pipeline;

pub use data::{
    lexicon::{Lexicon, LexiconEntry},
    normalize::{MappedMedication, MappingMethod},
};
pub use nlp::{ner::MatchMethod, status::ActiveStatus};
pub use pipeline::{BatchSummary, DocumentResult, Pipeline};
