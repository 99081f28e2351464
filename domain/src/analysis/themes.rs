//! Common theme extraction

use super::AnalysisConfig;
use super::report::CommonTheme;
use crate::orchestration::value_objects::ResponderOutput;
use crate::text::{cosine_similarity, mean_pairwise, ngrams};
use std::collections::BTreeMap;

/// Phrase used when responses agree overall but share no exact phrase
pub const GENERAL_AGREEMENT_THEME: &str = "general agreement across responses";

/// Extract shared phrases, falling back to overall lexical similarity.
///
/// Sorted by confidence (descending, ties by phrase), truncated to
/// `config.max_themes`.
pub fn extract_themes(responses: &[ResponderOutput], config: &AnalysisConfig) -> Vec<CommonTheme> {
    let total = responses.len();
    if total == 0 {
        return Vec::new();
    }

    let mut support: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for response in responses {
        for phrase in ngrams(&response.text, config.ngram_size) {
            let ids = support.entry(phrase).or_default();
            if !ids.contains(&response.responder_id) {
                ids.push(response.responder_id.clone());
            }
        }
    }

    let mut themes: Vec<CommonTheme> = support
        .into_iter()
        .filter(|(_, ids)| ids.len() >= config.min_theme_support)
        .map(|(phrase, ids)| CommonTheme {
            confidence: ids.len() as f64 / total as f64,
            phrase,
            responder_ids: ids,
        })
        .collect();

    if themes.is_empty() {
        return similarity_fallback(responses, config).into_iter().collect();
    }

    themes.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.phrase.cmp(&b.phrase))
    });
    themes.truncate(config.max_themes);
    themes
}

fn similarity_fallback(responses: &[ResponderOutput], config: &AnalysisConfig) -> Option<CommonTheme> {
    let texts: Vec<&str> = responses.iter().map(|r| r.text.as_str()).collect();
    let average = mean_pairwise(&texts, cosine_similarity)?;
    (average > config.theme_similarity_threshold).then(|| CommonTheme {
        phrase: GENERAL_AGREEMENT_THEME.to_string(),
        responder_ids: responses.iter().map(|r| r.responder_id.clone()).collect(),
        confidence: average.clamp(0.0, 1.0),
    })
}
