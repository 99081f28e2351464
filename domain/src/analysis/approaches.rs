//! Per-responder approach classification

use super::AnalysisConfig;
use super::report::{Methodology, UniqueApproach};
use crate::core::string::{first_sentence, take_chars};
use crate::orchestration::value_objects::ResponderOutput;
use crate::text::words;

/// Keyword stems per methodology. Single words match any token that
/// starts with the stem; phrases match as substrings.
const VOCABULARIES: [(Methodology, &[&str]); 6] = [
    (
        Methodology::Analytical,
        &["analy", "examin", "evaluat", "assess", "break down", "component", "factor"],
    ),
    (
        Methodology::Systematic,
        &["step", "systematic", "process", "procedure", "first", "then", "sequence", "framework"],
    ),
    (
        Methodology::Comparative,
        &["compar", "versus", "contrast", "whereas", "alternative", "trade-off", "tradeoff", "differ"],
    ),
    (
        Methodology::Empirical,
        &["data", "evidence", "study", "studies", "experiment", "observ", "measur", "statistic", "research"],
    ),
    (
        Methodology::Theoretical,
        &["theor", "principle", "concept", "abstract", "hypothes", "fundamental", "axiom"],
    ),
    (
        Methodology::Practical,
        &["practical", "example", "implement", "apply", "real-world", "hands-on", "in practice", "use case"],
    ),
];

/// Score every vocabulary and pick the dominant one.
///
/// No match, or a tie at the top, yields [`Methodology::General`].
pub fn classify_methodology(text: &str) -> Methodology {
    let lower = text.to_lowercase();
    let tokens = words(text);

    let scores: Vec<(Methodology, usize)> = VOCABULARIES
        .iter()
        .map(|(methodology, keywords)| {
            let score = keywords
                .iter()
                .map(|kw| {
                    if kw.contains([' ', '-']) {
                        lower.matches(kw).count()
                    } else {
                        tokens.iter().filter(|t| t.starts_with(kw)).count()
                    }
                })
                .sum();
            (*methodology, score)
        })
        .collect();

    let best = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
    if best == 0 {
        return Methodology::General;
    }
    let mut leaders = scores.iter().filter(|(_, s)| *s == best);
    match (leaders.next(), leaders.next()) {
        (Some((methodology, _)), None) => *methodology,
        _ => Methodology::General,
    }
}

/// Short description: the first sentence if it fits, otherwise the
/// first `max_chars` characters.
pub fn describe(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match first_sentence(trimmed) {
        Some(sentence) if sentence.chars().count() <= max_chars => sentence.to_string(),
        _ => {
            let head = take_chars(trimmed, max_chars);
            if head.len() < trimmed.len() {
                format!("{}...", head.trim_end())
            } else {
                head.to_string()
            }
        }
    }
}

/// One approach entry per response, in input order.
pub fn identify_approaches(
    responses: &[ResponderOutput],
    config: &AnalysisConfig,
) -> Vec<UniqueApproach> {
    responses
        .iter()
        .map(|r| UniqueApproach {
            responder_id: r.responder_id.clone(),
            methodology: classify_methodology(&r.text),
            description: describe(&r.text, config.description_max_chars),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_vocabulary() {
        assert_eq!(
            classify_methodology("We analyze each factor and assess the components."),
            Methodology::Analytical
        );
        assert_eq!(
            classify_methodology("Step one, then step two, then the final step."),
            Methodology::Systematic
        );
        assert_eq!(
            classify_methodology("Compare A versus B; in contrast, B differs."),
            Methodology::Comparative
        );
        assert_eq!(
            classify_methodology("The data and evidence from research studies show it."),
            Methodology::Empirical
        );
        assert_eq!(
            classify_methodology("In theory, the fundamental principle is a concept."),
            Methodology::Theoretical
        );
        assert_eq!(
            classify_methodology("A practical example: implement it and apply it in practice."),
            Methodology::Practical
        );
    }

    #[test]
    fn test_classify_defaults_to_general() {
        assert_eq!(classify_methodology("4"), Methodology::General);
        // one analytical hit, one empirical hit -> tie
        assert_eq!(classify_methodology("assess the data"), Methodology::General);
    }

    #[test]
    fn test_describe_first_sentence() {
        assert_eq!(describe("Use Rust. It is safe.", 100), "Use Rust");
    }

    #[test]
    fn test_describe_long_sentence_truncated() {
        let long = "word ".repeat(40);
        let desc = describe(&long, 20);
        assert!(desc.ends_with("..."));
        assert!(desc.chars().count() <= 23);
    }

    #[test]
    fn test_identify_approaches_one_per_response() {
        let responses = vec![
            ResponderOutput::new("a", "Step by step process."),
            ResponderOutput::new("b", "4"),
        ];
        let approaches = identify_approaches(&responses, &AnalysisConfig::default());
        assert_eq!(approaches.len(), 2);
        assert_eq!(approaches[0].responder_id, "a");
        assert_eq!(approaches[0].methodology, Methodology::Systematic);
        assert_eq!(approaches[1].methodology, Methodology::General);
        assert_eq!(approaches[1].description, "4");
    }
}
