//! Tokenization helpers

use std::collections::{HashMap, HashSet};

/// Case-fold, strip punctuation and split on whitespace.
pub fn words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Word tokens strictly longer than `longer_than` characters.
fn long_words(text: &str, longer_than: usize) -> impl Iterator<Item = String> {
    words(text)
        .into_iter()
        .filter(move |w| w.chars().count() > longer_than)
}

/// Distinct tokens longer than `longer_than` characters.
pub fn word_set(text: &str, longer_than: usize) -> HashSet<String> {
    long_words(text, longer_than).collect()
}

/// Term frequencies of tokens longer than `longer_than` characters.
pub fn word_frequencies(text: &str, longer_than: usize) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for word in long_words(text, longer_than) {
        *freq.entry(word).or_insert(0) += 1;
    }
    freq
}

/// Distinct `n`-word phrases of `text`, joined by single spaces.
pub fn ngrams(text: &str, n: usize) -> HashSet<String> {
    let tokens = words(text);
    if n == 0 || tokens.len() < n {
        return HashSet::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}
