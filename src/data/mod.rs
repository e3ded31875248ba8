//! Lexicon loading, terminology mapping and document I/O.

pub mod documents;
pub mod lexicon;
pub mod normalize;
