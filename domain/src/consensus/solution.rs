//! Consensus value objects

use crate::debate::round::DebateResult;
use serde::{Deserialize, Serialize};

/// A responder's final proposal. Exists only while consensus is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub responder_id: String,
    pub solution: String,
    pub insights: Vec<String>,
}

impl Proposal {
    pub fn new(
        responder_id: impl Into<String>,
        solution: impl Into<String>,
        insights: Vec<String>,
    ) -> Self {
        Self {
            responder_id: responder_id.into(),
            solution: solution.into(),
            insights,
        }
    }
}

/// An insight carried into the final solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub text: String,
    /// Responder that first contributed the insight
    pub responder_id: String,
    pub incorporated: bool,
}

/// The adjudicated answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub text: String,
    pub supporting_responders: Vec<String>,
    pub insights: Vec<Insight>,
    /// In [0, 1]
    pub confidence: f64,
}

/// How the final solution was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusMethod {
    /// A cluster of similar proposals held a majority
    Majority,
    /// No majority; sentences were merged and put to a vote
    Hybrid,
    /// Degraded result taken straight from the debate
    Fallback,
}

impl std::fmt::Display for ConsensusMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusMethod::Majority => write!(f, "majority"),
            ConsensusMethod::Hybrid => write!(f, "hybrid"),
            ConsensusMethod::Fallback => write!(f, "fallback"),
        }
    }
}

/// Output of the Consensus Builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub solution: Solution,
    /// In [0, 1]; equals the solution confidence
    pub agreement_level: f64,
    pub rationale: String,
    pub method: ConsensusMethod,
    pub duration_ms: u64,
}

impl ConsensusResult {
    /// Majority cluster result: confidence is cluster size over proposals.
    pub fn majority(
        text: impl Into<String>,
        supporters: Vec<String>,
        insights: Vec<Insight>,
        total_proposals: usize,
    ) -> Self {
        let confidence = ratio(supporters.len(), total_proposals);
        let rationale = format!(
            "A majority of {} out of {} proposals converged on the same solution. Supported by: {}.",
            supporters.len(),
            total_proposals,
            supporters.join(", ")
        );
        Self::build(text, supporters, insights, confidence, rationale, ConsensusMethod::Majority)
    }

    /// Hybrid result: confidence is approvals over all participants.
    pub fn hybrid(
        text: impl Into<String>,
        approvers: Vec<String>,
        insights: Vec<Insight>,
        distinct_approaches: usize,
        electorate: usize,
    ) -> Self {
        let confidence = ratio(approvers.len(), electorate);
        let rationale = format!(
            "No majority emerged among {} distinct approaches, so a hybrid solution was synthesized from their shared content. {} out of {} responders approved the hybrid.",
            distinct_approaches,
            approvers.len(),
            electorate
        );
        Self::build(text, approvers, insights, confidence, rationale, ConsensusMethod::Hybrid)
    }

    /// Degraded result built from the last round's first exchange.
    pub fn fallback(debate: &DebateResult, reason: &str, confidence: f64) -> Self {
        let exchange = debate.last_round().and_then(|r| r.exchanges.first());
        let (text, supporters) = match exchange {
            Some(e) => (e.latest_position().to_string(), vec![e.responder_id.clone()]),
            None => (String::new(), Vec::new()),
        };
        let rationale = format!("{}; using the latest debate position as the answer.", reason);
        Self::build(text, supporters, Vec::new(), confidence, rationale, ConsensusMethod::Fallback)
    }

    fn build(
        text: impl Into<String>,
        supporting_responders: Vec<String>,
        insights: Vec<Insight>,
        confidence: f64,
        rationale: String,
        method: ConsensusMethod,
    ) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        Self {
            solution: Solution {
                text: text.into(),
                supporting_responders,
                insights,
                confidence,
            },
            agreement_level: confidence,
            rationale,
            method,
            duration_ms: 0,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
