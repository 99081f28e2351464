//! Consensus domain
//!
//! Pure steps of consensus building: cluster final proposals, detect a
//! majority, synthesize a hybrid when there is none, merge insights and
//! tally acceptance votes.

pub mod clustering;
pub mod config;
pub mod hybrid;
pub mod insights;
pub mod solution;
pub mod vote;

pub use clustering::{cluster_proposals, find_majority, select_representative};
pub use config::ConsensusConfig;
pub use hybrid::synthesize_hybrid;
pub use insights::merge_insights;
pub use solution::{ConsensusMethod, ConsensusResult, Insight, Proposal, Solution};
pub use vote::{Vote, VoteResult};

/// Outcome of the pure majority step
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterDecision {
    /// A majority exists; carries the finished result
    Majority(ConsensusResult),
    /// No majority; carries the hybrid text to put to a vote and the
    /// number of distinct approaches (clusters)
    Hybrid {
        text: String,
        distinct_approaches: usize,
    },
}

/// Cluster proposals and either settle on a majority or prepare a hybrid.
///
/// Returns `None` when there are no proposals.
pub fn decide(proposals: &[Proposal], config: &ConsensusConfig) -> Option<ClusterDecision> {
    if proposals.is_empty() {
        return None;
    }
    let clusters = cluster_proposals(proposals, config);

    if let Some(cluster) = find_majority(&clusters, proposals.len(), config) {
        let representative = select_representative(cluster, proposals)?;
        let members: Vec<&Proposal> = cluster.iter().map(|&i| &proposals[i]).collect();
        let supporters = members.iter().map(|p| p.responder_id.clone()).collect();
        return Some(ClusterDecision::Majority(ConsensusResult::majority(
            proposals[representative].solution.clone(),
            supporters,
            merge_insights(members),
            proposals.len(),
        )));
    }

    Some(ClusterDecision::Hybrid {
        text: synthesize_hybrid(proposals, config.hybrid_min_token_len),
        distinct_approaches: clusters.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_majority() {
        let same = "Use a bounded channel with backpressure";
        let proposals = vec![
            Proposal::new("a", same, vec!["bounded".into()]),
            Proposal::new("b", same, vec!["bounded".into(), "metrics".into()]),
            Proposal::new("c", same, vec![]),
            Proposal::new("d", "Rewrite everything in assembly", vec!["speed".into()]),
        ];
        let Some(ClusterDecision::Majority(result)) = decide(&proposals, &ConsensusConfig::default())
        else {
            panic!("expected majority");
        };
        assert!((result.agreement_level - 0.75).abs() < 1e-9);
        assert_eq!(result.solution.supporting_responders, vec!["a", "b", "c"]);
        assert_eq!(result.solution.insights.len(), 2);
        assert!(result.rationale.contains("majority"));
    }

    #[test]
    fn test_decide_hybrid() {
        let proposals = vec![
            Proposal::new("a", "Cache the results.", vec![]),
            Proposal::new("b", "Shard the database.", vec![]),
        ];
        let decision = decide(&proposals, &ConsensusConfig::default()).unwrap();
        match decision {
            ClusterDecision::Hybrid {
                distinct_approaches,
                text,
            } => {
                assert_eq!(distinct_approaches, 2);
                assert!(!text.is_empty());
            }
            other => panic!("expected hybrid, got {:?}", other),
        }
    }

    #[test]
    fn test_decide_empty() {
        assert!(decide(&[], &ConsensusConfig::default()).is_none());
    }
}
