//! Hybrid solution synthesis

use super::solution::Proposal;
use crate::core::string::{first_sentence, split_sentences};
use crate::text::word_set;
use std::collections::{HashMap, HashSet};

/// Merge sentences that carry vocabulary shared by at least half of the
/// proposals. Falls back to each proposal's first sentence.
pub fn synthesize_hybrid(proposals: &[Proposal], min_token_len: usize) -> String {
    let total = proposals.len();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for proposal in proposals {
        for word in word_set(&proposal.solution, min_token_len) {
            *counts.entry(word).or_default() += 1;
        }
    }
    let common: HashSet<String> = counts
        .into_iter()
        .filter(|(_, n)| n * 2 >= total)
        .map(|(w, _)| w)
        .collect();

    let mut seen = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();
    for proposal in proposals {
        for sentence in split_sentences(&proposal.solution) {
            let shares_vocabulary = word_set(sentence, min_token_len)
                .iter()
                .any(|w| common.contains(w));
            if shares_vocabulary && seen.insert(sentence.to_lowercase()) {
                kept.push(sentence);
            }
        }
    }

    if kept.is_empty() {
        kept = proposals
            .iter()
            .filter_map(|p| first_sentence(&p.solution))
            .collect();
    }

    kept.iter()
        .map(|s| format!("{}.", s))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_sentences_with_common_words() {
        let proposals = vec![
            Proposal::new("a", "Cache the results. Paint it blue.", vec![]),
            Proposal::new("b", "Cache aggressively. Use tabs.", vec![]),
            Proposal::new("c", "Shard the database.", vec![]),
        ];
        let hybrid = synthesize_hybrid(&proposals, 3);
        // "cache" appears in 2 of 3 proposals
        assert_eq!(hybrid, "Cache the results. Cache aggressively.");
    }

    #[test]
    fn test_deduplicates_sentences_case_insensitively() {
        let proposals = vec![
            Proposal::new("a", "Cache the results.", vec![]),
            Proposal::new("b", "cache the results.", vec![]),
        ];
        assert_eq!(synthesize_hybrid(&proposals, 3), "Cache the results.");
    }

    #[test]
    fn test_falls_back_to_first_sentences() {
        let proposals = vec![
            Proposal::new("a", "Go left. Then stop.", vec![]),
            Proposal::new("b", "Run far. Now.", vec![]),
            Proposal::new("c", "Be calm.", vec![]),
        ];
        // no word longer than 3 chars is shared by half
        assert_eq!(synthesize_hybrid(&proposals, 3), "Go left. Run far. Be calm.");
    }
}
