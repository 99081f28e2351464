//! Consensus heuristics

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Tuned thresholds for clustering and majority detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Jaccard overlap needed to join a cluster
    pub similarity_threshold: f64,
    /// Largest cluster share that must be exceeded for a majority
    pub majority_threshold: f64,
    /// Token length floor for clustering overlap
    pub cluster_min_token_len: usize,
    /// Token length floor for hybrid common-word detection
    pub hybrid_min_token_len: usize,
    /// Confidence reported by the degraded fallback
    pub fallback_confidence: f64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            majority_threshold: 0.5,
            cluster_min_token_len: 2,
            hybrid_min_token_len: 3,
            fallback_confidence: 0.5,
        }
    }
}

impl ConsensusConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("consensus.similarity_threshold", self.similarity_threshold),
            ("consensus.majority_threshold", self.majority_threshold),
            ("consensus.fallback_confidence", self.fallback_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DomainError::config(field, "must be within [0, 1]"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ConsensusConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.similarity_threshold - 0.6).abs() < 1e-9);
        assert!((config.majority_threshold - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range() {
        let config = ConsensusConfig {
            majority_threshold: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
