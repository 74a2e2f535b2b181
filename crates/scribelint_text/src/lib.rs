//! # scribelint_text
//!
//! Natural-language plumbing for the linter:
//!
//! - [`SentenceSplitter`]: abbreviation-aware sentence segmentation
//! - [`Tokenizer`]: word and punctuation tokenization
//! - [`Tagger`]: a lexicon + suffix-heuristic part-of-speech tagger
//! - [`syllables`]: deterministic syllable counting
//! - [`TextStats`] and the readability metric functions

mod splitter;
mod stats;
mod tagger;
mod tokenizer;

pub mod syllables;

pub use splitter::{Sentence, SentenceSplitter};
pub use stats::{
    automated_readability_index, coleman_liau, flesch_kincaid_grade, gunning_fog, smog, TextStats,
};
pub use tagger::{TaggedToken, Tagger};
pub use tokenizer::{Token, Tokenizer};
