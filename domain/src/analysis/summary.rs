//! Natural-language digest of an analysis

use super::report::{CommonTheme, Difference, DifferenceKind, Methodology, UniqueApproach};
use std::collections::BTreeMap;

/// Deterministic summary of counts; no model call involved.
pub fn summarize(
    response_count: usize,
    themes: &[CommonTheme],
    approaches: &[UniqueApproach],
    differences: &[Difference],
) -> String {
    let mut parts = vec![format!("Analyzed {} responses.", response_count)];

    if themes.is_empty() {
        parts.push("There were no significant common themes.".to_string());
    } else {
        parts.push(format!(
            "Found {} common theme{}.",
            themes.len(),
            plural(themes.len())
        ));
    }

    let mut methodologies: BTreeMap<Methodology, usize> = BTreeMap::new();
    for approach in approaches {
        *methodologies.entry(approach.methodology).or_default() += 1;
    }
    if !methodologies.is_empty() {
        let listed: Vec<String> = methodologies
            .iter()
            .map(|(m, n)| format!("{} ({})", m, n))
            .collect();
        parts.push(format!(
            "Responses used {} distinct methodolog{}: {}.",
            methodologies.len(),
            if methodologies.len() == 1 { "y" } else { "ies" },
            listed.join(", ")
        ));
    }

    if differences.is_empty() {
        parts.push("No significant differences were identified.".to_string());
    } else {
        let mut by_kind: BTreeMap<DifferenceKind, usize> = BTreeMap::new();
        for difference in differences {
            *by_kind.entry(difference.kind).or_default() += 1;
        }
        let listed: Vec<String> = by_kind
            .iter()
            .map(|(k, n)| format!("{} ({})", k, n))
            .collect();
        parts.push(format!(
            "Identified {} difference{}: {}.",
            differences.len(),
            plural(differences.len()),
            listed.join(", ")
        ));
    }

    parts.join(" ")
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
