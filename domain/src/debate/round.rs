//! Debate round value objects

use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// One responder's contribution to a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub responder_id: String,
    /// Critique of the other responders' positions
    pub critique: String,
    /// Defense of its own position
    pub defense: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_position: Option<String>,
    pub timestamp: u64,
}

impl Exchange {
    pub fn new(
        responder_id: impl Into<String>,
        critique: impl Into<String>,
        defense: impl Into<String>,
        revised_position: Option<String>,
    ) -> Self {
        Self {
            responder_id: responder_id.into(),
            critique: critique.into(),
            defense: defense.into(),
            revised_position,
            timestamp: now_millis(),
        }
    }

    /// Latest stated position: revised position, else defense, else critique.
    pub fn latest_position(&self) -> &str {
        [self.revised_position.as_deref(), Some(self.defense.as_str())]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(self.critique.as_str())
    }
}

/// A completed round; appended once and never modified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateRound {
    /// 1-indexed round number
    pub round: usize,
    pub exchanges: Vec<Exchange>,
    /// 1 minus mean pairwise overlap of latest positions, in [0, 1]
    pub disagreement_level: f64,
}

impl DebateRound {
    pub fn new(round: usize, exchanges: Vec<Exchange>, disagreement_level: f64) -> Self {
        Self {
            round,
            exchanges,
            disagreement_level: disagreement_level.clamp(0.0, 1.0),
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.exchanges.iter().map(|e| e.responder_id.as_str())
    }
}

/// Outcome of a full debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateResult {
    pub rounds: Vec<DebateRound>,
    /// 1 minus the last round's disagreement
    pub convergence_score: f64,
    pub duration_ms: u64,
    /// Responders still active after the last round
    pub final_participants: Vec<String>,
}

impl DebateResult {
    pub fn new(rounds: Vec<DebateRound>, duration_ms: u64, final_participants: Vec<String>) -> Self {
        let convergence_score = rounds
            .last()
            .map(|r| 1.0 - r.disagreement_level)
            .unwrap_or(0.0);
        Self {
            rounds,
            convergence_score,
            duration_ms,
            final_participants,
        }
    }

    pub fn last_round(&self) -> Option<&DebateRound> {
        self.rounds.last()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_position_precedence() {
        let e = Exchange::new("a", "crit", "def", Some("rev".into()));
        assert_eq!(e.latest_position(), "rev");

        let e = Exchange::new("a", "crit", "def", None);
        assert_eq!(e.latest_position(), "def");

        let e = Exchange::new("a", "crit", "", None);
        assert_eq!(e.latest_position(), "crit");

        let e = Exchange::new("a", "crit", "def", Some("  ".into()));
        assert_eq!(e.latest_position(), "def");
    }

    #[test]
    fn test_round_clamps_disagreement() {
        assert_eq!(DebateRound::new(1, vec![], 1.7).disagreement_level, 1.0);
        assert_eq!(DebateRound::new(1, vec![], -0.2).disagreement_level, 0.0);
    }

    #[test]
    fn test_result_convergence_from_last_round() {
        let rounds = vec![DebateRound::new(1, vec![], 0.6), DebateRound::new(2, vec![], 0.15)];
        let result = DebateResult::new(rounds, 42, vec!["a".into(), "b".into()]);
        assert!((result.convergence_score - 0.85).abs() < 1e-9);
        assert_eq!(result.round_count(), 2);
        assert_eq!(result.last_round().unwrap().round, 2);
    }
}
