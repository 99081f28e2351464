//! Similarity measures
//!
//! Both measures treat two texts with no qualifying tokens as identical
//! (1.0) and a text with tokens against one without as disjoint (0.0).

use super::tokenize::{word_frequencies, word_set};

/// Cosine similarity of word-frequency vectors (tokens longer than 3 chars).
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let fa = word_frequencies(a, 3);
    let fb = word_frequencies(b, 3);

    match (fa.is_empty(), fb.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let dot: f64 = fa
        .iter()
        .filter_map(|(word, &ca)| fb.get(word).map(|&cb| (ca * cb) as f64))
        .sum();
    let norm = |f: &std::collections::HashMap<String, usize>| {
        f.values().map(|&c| (c * c) as f64).sum::<f64>().sqrt()
    };

    (dot / (norm(&fa) * norm(&fb))).clamp(0.0, 1.0)
}

/// Jaccard overlap of distinct word sets (tokens longer than `longer_than`).
pub fn jaccard_similarity(a: &str, b: &str, longer_than: usize) -> f64 {
    let sa = word_set(a, longer_than);
    let sb = word_set(b, longer_than);

    match (sa.is_empty(), sb.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let intersection = sa.intersection(&sb).count();
    let union = sa.union(&sb).count();
    intersection as f64 / union as f64
}

/// Mean of `measure` over every unordered pair of `texts`.
///
/// Returns `None` when there are fewer than two texts.
pub fn mean_pairwise<F>(texts: &[&str], measure: F) -> Option<f64>
where
    F: Fn(&str, &str) -> f64,
{
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..texts.len() {
        for j in (i + 1)..texts.len() {
            total += measure(texts[i], texts[j]);
            pairs += 1;
        }
    }
    (pairs > 0).then(|| total / pairs as f64)
}
