//! Insight merging

use super::solution::{Insight, Proposal};
use std::collections::HashSet;

/// Deduplicate insights case-insensitively, keeping the first contributor.
pub fn merge_insights<'a>(proposals: impl IntoIterator<Item = &'a Proposal>) -> Vec<Insight> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for proposal in proposals {
        for insight in &proposal.insights {
            let text = insight.trim();
            if text.is_empty() || !seen.insert(text.to_lowercase()) {
                continue;
            }
            merged.push(Insight {
                text: text.to_string(),
                responder_id: proposal.responder_id.clone(),
                incorporated: true,
            });
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_dedupes_case_insensitively() {
        let proposals = vec![
            Proposal::new("a", "", vec!["Use caching".into(), "  ".into()]),
            Proposal::new("b", "", vec!["use CACHING".into(), "Add metrics".into()]),
        ];
        let merged = merge_insights(&proposals);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "Use caching");
        assert_eq!(merged[0].responder_id, "a");
        assert_eq!(merged[1].responder_id, "b");
        assert!(merged.iter().all(|i| i.incorporated));
    }
}
