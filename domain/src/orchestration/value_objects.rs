//! Orchestration value objects - immutable per-call result types.
//!
//! - [`Generation`] - What a responder returns for one prompt
//! - [`ResponderOutput`] - A successful answer attributed to a responder
//! - [`ResponderFailure`] - A failed call attributed to a responder
//! - [`GenerationContext`] - Optional context passed through to responders

use crate::analysis::report::AnalysisReport;
use crate::debate::round::DebateRound;
use crate::util::{estimate_tokens, now_millis};
use serde::{Deserialize, Serialize};

/// Raw result of one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    /// Token count reported by the provider, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<usize>,
    /// Wall-clock latency of the call in milliseconds
    pub latency_ms: u64,
    pub timestamp: u64,
}

impl Generation {
    pub fn new(text: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            text: text.into(),
            token_count: None,
            latency_ms,
            timestamp: now_millis(),
        }
    }

    pub fn with_token_count(mut self, tokens: usize) -> Self {
        self.token_count = Some(tokens);
        self
    }
}

/// Successful answer from one responder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderOutput {
    /// The responder that generated this output
    pub responder_id: String,
    pub text: String,
    /// Exact when the provider reported usage, otherwise estimated
    pub token_count: usize,
    pub latency_ms: u64,
    pub timestamp: u64,
}

impl ResponderOutput {
    /// Attribute a generation to a responder, estimating tokens if needed.
    pub fn from_generation(responder_id: impl Into<String>, generation: Generation) -> Self {
        let token_count = generation
            .token_count
            .unwrap_or_else(|| estimate_tokens(&generation.text));
        Self {
            responder_id: responder_id.into(),
            text: generation.text,
            token_count,
            latency_ms: generation.latency_ms,
            timestamp: generation.timestamp,
        }
    }

    /// Convenience constructor for already-known text
    pub fn new(responder_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_generation(responder_id, Generation::new(text, 0))
    }
}

/// A failed call attributed to a responder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderFailure {
    pub responder_id: String,
    pub error: String,
    pub timestamp: u64,
}

impl ResponderFailure {
    pub fn new(responder_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            responder_id: responder_id.into(),
            error: error.into(),
            timestamp: now_millis(),
        }
    }
}

impl std::fmt::Display for ResponderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.responder_id, self.error)
    }
}

/// Optional context handed to a responder alongside the prompt.
///
/// Adapters may use it to build richer prompts; the pipeline never reads
/// it back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationContext {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peer_responses: Vec<ResponderOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debate_history: Vec<DebateRound>,
}

impl GenerationContext {
    pub fn with_history(mut self, history: Vec<DebateRound>) -> Self {
        self.debate_history = history;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.peer_responses.is_empty() && self.analysis.is_none() && self.debate_history.is_empty()
    }
}
