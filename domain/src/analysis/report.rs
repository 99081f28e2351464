//! Analysis report value objects

use crate::util::now_millis;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A phrase shared by several responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTheme {
    pub phrase: String,
    /// Responders whose answers contain the phrase
    pub responder_ids: Vec<String>,
    /// Share of responders supporting the theme, in [0, 1]
    pub confidence: f64,
}

/// Methodology tag assigned to a single response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    Analytical,
    Systematic,
    Comparative,
    Empirical,
    Theoretical,
    Practical,
    /// No vocabulary dominated
    General,
}

impl Methodology {
    pub fn as_str(&self) -> &str {
        match self {
            Methodology::Analytical => "analytical",
            Methodology::Systematic => "systematic",
            Methodology::Comparative => "comparative",
            Methodology::Empirical => "empirical",
            Methodology::Theoretical => "theoretical",
            Methodology::Practical => "practical",
            Methodology::General => "general",
        }
    }
}

impl std::fmt::Display for Methodology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How one responder approached the question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueApproach {
    pub responder_id: String,
    pub methodology: Methodology,
    /// First sentence, or the first characters of the response
    pub description: String,
}

/// Category of a disagreement between two responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    Conclusion,
    Assumption,
    Reasoning,
    Methodology,
}

impl DifferenceKind {
    pub fn as_str(&self) -> &str {
        match self {
            DifferenceKind::Conclusion => "conclusion",
            DifferenceKind::Assumption => "assumption",
            DifferenceKind::Reasoning => "reasoning",
            DifferenceKind::Methodology => "methodology",
        }
    }
}

impl std::fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A categorized difference between two responders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub kind: DifferenceKind,
    /// The two responders involved, sorted
    pub responder_ids: Vec<String>,
    pub description: String,
}

/// Cross-response analysis of one set of outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub common_themes: Vec<CommonTheme>,
    pub approaches: Vec<UniqueApproach>,
    pub differences: Vec<Difference>,
    pub summary: String,
    pub timestamp: u64,
    /// Set when the report is the degraded result of a timeout
    #[serde(default)]
    pub timed_out: bool,
}

impl AnalysisReport {
    pub fn new(
        common_themes: Vec<CommonTheme>,
        approaches: Vec<UniqueApproach>,
        differences: Vec<Difference>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            common_themes,
            approaches,
            differences,
            summary: summary.into(),
            timestamp: now_millis(),
            timed_out: false,
        }
    }

    /// Empty report returned when analysis exceeds its time bound
    pub fn timed_out(after: Duration) -> Self {
        Self {
            timed_out: true,
            ..Self::new(
                Vec::new(),
                Vec::new(),
                Vec::new(),
                format!(
                    "Analysis timed out after {}s; no themes, approaches or differences were extracted.",
                    after.as_secs()
                ),
            )
        }
    }

    pub fn is_empty(&self) -> bool {
        self.common_themes.is_empty() && self.approaches.is_empty() && self.differences.is_empty()
    }
}
