//! Lexical text utilities shared by analysis, debate and consensus.
//!
//! Everything here works on plain word tokens: case-folded, punctuation
//! stripped, split on whitespace. No stemming, no stop words.

pub mod similarity;
pub mod tokenize;

pub use similarity::{cosine_similarity, jaccard_similarity, mean_pairwise};
pub use tokenize::{ngrams, word_frequencies, word_set, words};
