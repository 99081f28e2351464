//! Acceptance votes on a synthesized hybrid solution

use serde::{Deserialize, Serialize};

/// A single responder's acceptance vote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub responder_id: String,
    pub approved: bool,
    /// Raw answer, or the error if the vote call failed
    pub reasoning: String,
}

impl Vote {
    pub fn new(responder_id: impl Into<String>, approved: bool, reasoning: impl Into<String>) -> Self {
        Self {
            responder_id: responder_id.into(),
            approved,
            reasoning: reasoning.into(),
        }
    }

    pub fn approve(responder_id: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self::new(responder_id, true, reasoning)
    }

    pub fn reject(responder_id: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self::new(responder_id, false, reasoning)
    }
}

/// Aggregated acceptance votes
///
/// `electorate` is the number of responders that were asked, so a vote
/// that never arrived still counts against the ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResult {
    pub approve_count: usize,
    pub electorate: usize,
    pub votes: Vec<Vote>,
}

impl VoteResult {
    pub fn from_votes(votes: Vec<Vote>, electorate: usize) -> Self {
        let approve_count = votes.iter().filter(|v| v.approved).count();
        Self {
            approve_count,
            electorate: electorate.max(votes.len()),
            votes,
        }
    }

    /// Approvals over the electorate (0.0 to 1.0)
    pub fn approval_ratio(&self) -> f64 {
        if self.electorate == 0 {
            0.0
        } else {
            self.approve_count as f64 / self.electorate as f64
        }
    }

    pub fn approvers(&self) -> Vec<String> {
        self.votes
            .iter()
            .filter(|v| v.approved)
            .map(|v| v.responder_id.clone())
            .collect()
    }

    /// Generate a visual vote summary (e.g., "[●●○]")
    pub fn vote_summary(&self) -> String {
        let mut summary = String::from("[");
        for vote in &self.votes {
            summary.push(if vote.approved { '●' } else { '○' });
        }
        summary.push(']');
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_counts_missing_votes() {
        let votes = vec![Vote::approve("a", "YES"), Vote::reject("b", "NO")];
        let result = VoteResult::from_votes(votes, 4);
        assert_eq!(result.approve_count, 1);
        assert!((result.approval_ratio() - 0.25).abs() < 1e-9);
        assert_eq!(result.approvers(), vec!["a"]);
    }

    #[test]
    fn test_empty_electorate() {
        assert_eq!(VoteResult::from_votes(vec![], 0).approval_ratio(), 0.0);
    }

    #[test]
    fn test_vote_summary() {
        let votes = vec![
            Vote::approve("a", ""),
            Vote::approve("b", ""),
            Vote::reject("c", ""),
        ];
        assert_eq!(VoteResult::from_votes(votes, 3).vote_summary(), "[●●○]");
    }
}
