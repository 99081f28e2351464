//! Analysis Engine
//!
//! A pure function from one round of responder outputs to an
//! [`AnalysisReport`]: common themes, a methodology tag per responder,
//! categorized pairwise differences and a plain-text digest.
//!
//! The time bound lives in the application layer; nothing here blocks
//! or performs I/O.

pub mod approaches;
pub mod differences;
pub mod report;
pub mod summary;
pub mod themes;

pub use report::{
    AnalysisReport, CommonTheme, Difference, DifferenceKind, Methodology, UniqueApproach,
};

use crate::core::error::DomainError;
use crate::orchestration::value_objects::ResponderOutput;
use serde::{Deserialize, Serialize};

/// Tuned heuristics for the Analysis Engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Words per candidate theme phrase
    pub ngram_size: usize,
    /// Minimum responses that must share a phrase
    pub min_theme_support: usize,
    /// Themes retained after sorting
    pub max_themes: usize,
    /// Average cosine similarity above which a generic theme is reported
    pub theme_similarity_threshold: f64,
    /// Pairs with cosine similarity below this are reported as differences
    pub difference_threshold: f64,
    /// Upper bound on approach descriptions
    pub description_max_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ngram_size: 3,
            min_theme_support: 2,
            max_themes: 5,
            theme_similarity_threshold: 0.3,
            difference_threshold: 0.3,
            description_max_chars: 100,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ngram_size == 0 {
            return Err(DomainError::config("analysis.ngram_size", "must be at least 1"));
        }
        if self.min_theme_support < 2 {
            return Err(DomainError::config(
                "analysis.min_theme_support",
                "a theme needs at least 2 supporting responses",
            ));
        }
        for (field, value) in [
            ("analysis.theme_similarity_threshold", self.theme_similarity_threshold),
            ("analysis.difference_threshold", self.difference_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DomainError::config(field, "must be within [0, 1]"));
            }
        }
        Ok(())
    }
}

/// Stateless analyzer over a set of responses
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyze one round of outputs
    pub fn analyze(&self, responses: &[ResponderOutput]) -> AnalysisReport {
        let themes = themes::extract_themes(responses, &self.config);
        let approaches = approaches::identify_approaches(responses, &self.config);
        let differences = differences::identify_differences(responses, &self.config);
        let summary = summary::summarize(responses.len(), &themes, &approaches, &differences);

        AnalysisReport::new(themes, approaches, differences, summary)
    }
}
