//! Pairwise difference detection

use super::AnalysisConfig;
use super::report::{Difference, DifferenceKind};
use crate::orchestration::value_objects::ResponderOutput;
use crate::text::cosine_similarity;
use std::collections::HashSet;

const CONCLUSION_INDICATORS: &[&str] = &[
    "therefore",
    "conclude",
    "conclusion",
    "thus",
    "in summary",
    "ultimately",
    "the answer is",
];

const ASSUMPTION_INDICATORS: &[&str] = &[
    "assume",
    "assuming",
    "assumption",
    "presume",
    "given that",
    "suppose",
    "if we consider",
];

const REASONING_INDICATORS: &[&str] = &[
    "because",
    "since",
    "reason",
    "due to",
    "as a result",
    "consequently",
    "which means",
];

/// Classify why two dissimilar texts differ, by indicator priority.
pub fn classify_difference(a: &str, b: &str) -> DifferenceKind {
    let combined = format!("{}\n{}", a.to_lowercase(), b.to_lowercase());
    let has_any = |indicators: &[&str]| indicators.iter().any(|w| combined.contains(w));

    if has_any(CONCLUSION_INDICATORS) {
        DifferenceKind::Conclusion
    } else if has_any(ASSUMPTION_INDICATORS) {
        DifferenceKind::Assumption
    } else if has_any(REASONING_INDICATORS) {
        DifferenceKind::Reasoning
    } else {
        DifferenceKind::Methodology
    }
}

fn describe(kind: DifferenceKind, a: &str, b: &str) -> String {
    match kind {
        DifferenceKind::Conclusion => format!("{} and {} reach different conclusions", a, b),
        DifferenceKind::Assumption => format!("{} and {} start from different assumptions", a, b),
        DifferenceKind::Reasoning => format!("{} and {} follow different lines of reasoning", a, b),
        DifferenceKind::Methodology => format!("{} and {} approach the question differently", a, b),
    }
}

/// Every pair below the similarity threshold, deduplicated by
/// (kind, sorted responder pair).
pub fn identify_differences(
    responses: &[ResponderOutput],
    config: &AnalysisConfig,
) -> Vec<Difference> {
    let mut seen: HashSet<(DifferenceKind, String, String)> = HashSet::new();
    let mut differences = Vec::new();

    for (i, first) in responses.iter().enumerate() {
        for second in &responses[i + 1..] {
            if cosine_similarity(&first.text, &second.text) >= config.difference_threshold {
                continue;
            }

            let kind = classify_difference(&first.text, &second.text);
            let mut pair = [first.responder_id.clone(), second.responder_id.clone()];
            pair.sort();

            if seen.insert((kind, pair[0].clone(), pair[1].clone())) {
                differences.push(Difference {
                    kind,
                    description: describe(kind, &pair[0], &pair[1]),
                    responder_ids: pair.to_vec(),
                });
            }
        }
    }

    differences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_priority() {
        // conclusion wins over reasoning
        assert_eq!(
            classify_difference("Therefore X.", "Because of Y."),
            DifferenceKind::Conclusion
        );
        assert_eq!(
            classify_difference("Assuming a closed system", "Because of entropy"),
            DifferenceKind::Assumption
        );
        assert_eq!(
            classify_difference("It fails due to load", "Memory pressure"),
            DifferenceKind::Reasoning
        );
        assert_eq!(
            classify_difference("Use Python", "Use Haskell"),
            DifferenceKind::Methodology
        );
    }

    #[test]
    fn test_similar_responses_have_no_differences() {
        let responses = vec![
            ResponderOutput::new("a", "The answer is four"),
            ResponderOutput::new("b", "The answer is four"),
        ];
        assert!(identify_differences(&responses, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_dissimilar_pair_sorted_ids() {
        let responses = vec![
            ResponderOutput::new("zeta", "Bananas contain potassium"),
            ResponderOutput::new("alpha", "Jupiter has many moons"),
        ];
        let diffs = identify_differences(&responses, &AnalysisConfig::default());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].responder_ids, vec!["alpha", "zeta"]);
        assert_eq!(diffs[0].kind, DifferenceKind::Methodology);
    }

    #[test]
    fn test_three_way_disagreement() {
        let responses = vec![
            ResponderOutput::new("a", "Bananas contain potassium"),
            ResponderOutput::new("b", "Jupiter has many moons"),
            ResponderOutput::new("c", "Glaciers carve valleys slowly"),
        ];
        let diffs = identify_differences(&responses, &AnalysisConfig::default());
        assert_eq!(diffs.len(), 3);
    }
}
