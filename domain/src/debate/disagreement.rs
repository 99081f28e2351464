//! Disagreement measurement and termination rule

use super::config::DebateConfig;
use crate::text::{jaccard_similarity, mean_pairwise};

/// 1 minus the mean pairwise Jaccard overlap of `positions`.
///
/// Fewer than two positions cannot disagree and yield 0.0.
pub fn disagreement_level(positions: &[&str], min_token_len: usize) -> f64 {
    mean_pairwise(positions, |a, b| jaccard_similarity(a, b, min_token_len))
        .map(|similarity| (1.0 - similarity).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Whether the debate should stop after `round` with the given disagreement.
pub fn should_terminate(round: usize, disagreement: f64, config: &DebateConfig) -> bool {
    if round >= config.max_rounds {
        return true;
    }
    round >= config.min_rounds && disagreement < config.convergence_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_positions_have_zero_disagreement() {
        let p = "Use a bounded channel for backpressure";
        assert_eq!(disagreement_level(&[p, p, p], 2), 0.0);
    }

    #[test]
    fn test_disjoint_positions_fully_disagree() {
        assert_eq!(disagreement_level(&["red apples", "blue oceans"], 2), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        // {rust, safe, fast} vs {rust, safe, slow}: jaccard 0.5
        let d = disagreement_level(&["rust safe fast", "rust safe slow"], 2);
        assert!((d - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_position() {
        assert_eq!(disagreement_level(&["alone"], 2), 0.0);
    }

    #[test]
    fn test_should_terminate() {
        let config = DebateConfig::default().with_rounds(2, 4);
        // converged but min rounds not reached
        assert!(!should_terminate(1, 0.0, &config));
        assert!(should_terminate(2, 0.1, &config));
        assert!(!should_terminate(2, 0.5, &config));
        // max rounds always terminates
        assert!(should_terminate(4, 0.9, &config));
    }
}
