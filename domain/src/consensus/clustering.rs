//! Greedy proposal clustering and majority detection

use super::config::ConsensusConfig;
use super::solution::Proposal;
use crate::text::jaccard_similarity;

/// Group proposals greedily by overlap with each cluster's first member.
///
/// Returns clusters as index lists into `proposals`, in creation order.
pub fn cluster_proposals(proposals: &[Proposal], config: &ConsensusConfig) -> Vec<Vec<usize>> {
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for (idx, proposal) in proposals.iter().enumerate() {
        let home = clusters.iter_mut().find(|cluster| {
            let seed = &proposals[cluster[0]];
            jaccard_similarity(
                &seed.solution,
                &proposal.solution,
                config.cluster_min_token_len,
            ) >= config.similarity_threshold
        });
        match home {
            Some(cluster) => cluster.push(idx),
            None => clusters.push(vec![idx]),
        }
    }

    clusters
}

/// The largest cluster, if its share strictly exceeds the majority threshold.
pub fn find_majority<'a>(
    clusters: &'a [Vec<usize>],
    total: usize,
    config: &ConsensusConfig,
) -> Option<&'a [usize]> {
    if total == 0 {
        return None;
    }
    let largest = clusters
        .iter()
        .reduce(|best, c| if c.len() > best.len() { c } else { best })?;
    (largest.len() as f64 / total as f64 > config.majority_threshold).then_some(largest.as_slice())
}

/// Cluster member with the most insights; the earliest wins ties.
pub fn select_representative(cluster: &[usize], proposals: &[Proposal]) -> Option<usize> {
    cluster
        .iter()
        .copied()
        .reduce(|best, idx| {
            if proposals[idx].insights.len() > proposals[best].insights.len() {
                idx
            } else {
                best
            }
        })
}
