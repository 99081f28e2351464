//! Debate round configuration

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Hard upper bound on rounds regardless of configuration
pub const MAX_DEBATE_ROUNDS: usize = 5;

/// Round limits and convergence threshold for a debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    /// Rounds that always run before early termination is considered
    pub min_rounds: usize,
    pub max_rounds: usize,
    /// Disagreement below this ends the debate early
    pub convergence_threshold: f64,
    /// Tokens must be longer than this to count toward overlap
    pub min_token_len: usize,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            min_rounds: 1,
            max_rounds: MAX_DEBATE_ROUNDS,
            convergence_threshold: 0.2,
            min_token_len: 2,
        }
    }
}

impl DebateConfig {
    pub fn with_rounds(mut self, min: usize, max: usize) -> Self {
        self.min_rounds = min;
        self.max_rounds = max;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.min_rounds < 1 {
            return Err(DomainError::config("debate.min_rounds", "must be at least 1"));
        }
        if self.max_rounds > MAX_DEBATE_ROUNDS {
            return Err(DomainError::config(
                "debate.max_rounds",
                format!("must be at most {}", MAX_DEBATE_ROUNDS),
            ));
        }
        if self.min_rounds > self.max_rounds {
            return Err(DomainError::config(
                "debate.min_rounds",
                "must not exceed max_rounds",
            ));
        }
        if !(0.0..=1.0).contains(&self.convergence_threshold) {
            return Err(DomainError::config(
                "debate.convergence_threshold",
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DebateConfig::default();
        assert_eq!(config.min_rounds, 1);
        assert_eq!(config.max_rounds, 5);
        assert!((config.convergence_threshold - 0.2).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_round_bounds() {
        assert!(DebateConfig::default().with_rounds(0, 3).validate().is_err());
        assert!(DebateConfig::default().with_rounds(1, 6).validate().is_err());
        assert!(DebateConfig::default().with_rounds(4, 2).validate().is_err());
        assert!(DebateConfig::default().with_rounds(2, 2).validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let config = DebateConfig::default().with_convergence_threshold(-0.1);
        assert!(config.validate().is_err());
    }
}
