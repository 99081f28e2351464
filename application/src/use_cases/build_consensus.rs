//! Build consensus use case
//!
//! Collects a final proposal from every responder still in the debate,
//! then settles on a majority cluster or puts a synthesized hybrid to a
//! vote of every participant. The whole phase is time-bounded; running
//! out of time (or proposals) degrades to the latest debate position.

use crate::ports::progress::ProgressNotifier;
use crate::ports::responder::Responder;
use crate::resilience::ResilientCaller;
use deliberation_domain::consensus::{ClusterDecision, decide, merge_insights};
use deliberation_domain::{
    ConsensusConfig, ConsensusResult, DebateResult, Phase, PromptTemplate, Proposal, Query,
    ResponderFailure, Vote, VoteResult, parse_acceptance_response, parse_proposal_response,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{info, warn};

/// The settled consensus plus the proposal and vote calls that failed
#[derive(Debug, Clone)]
pub struct ConsensusOutcome {
    pub result: ConsensusResult,
    pub failures: Vec<ResponderFailure>,
}

pub struct BuildConsensusUseCase {
    caller: ResilientCaller,
    config: ConsensusConfig,
    phase_timeout: Duration,
    call_timeout: Duration,
}

impl BuildConsensusUseCase {
    pub fn new(
        caller: ResilientCaller,
        config: ConsensusConfig,
        phase_timeout: Duration,
        call_timeout: Duration,
    ) -> Self {
        Self {
            caller,
            config,
            phase_timeout,
            call_timeout,
        }
    }

    /// Never fails.
    ///
    /// `participants` is the electorate for a hybrid vote; only those
    /// listed in `debate.final_participants` are asked for proposals.
    /// Calls still in flight when the phase times out are not reported
    /// as failures.
    pub async fn execute(
        &self,
        query: &Query,
        participants: &[Arc<dyn Responder>],
        debate: &DebateResult,
        progress: &dyn ProgressNotifier,
    ) -> ConsensusOutcome {
        let started = Instant::now();
        let mut failures = Vec::new();
        let result = match timeout(
            self.phase_timeout,
            self.build(query, participants, debate, progress, &mut failures),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!("Consensus timed out after {:?}", self.phase_timeout);
                ConsensusResult::fallback(
                    debate,
                    &format!("Consensus timed out after {}s", self.phase_timeout.as_secs()),
                    self.config.fallback_confidence,
                )
            }
        };
        ConsensusOutcome {
            result: result.with_duration(started.elapsed().as_millis() as u64),
            failures,
        }
    }

    async fn build(
        &self,
        query: &Query,
        participants: &[Arc<dyn Responder>],
        debate: &DebateResult,
        progress: &dyn ProgressNotifier,
        failures: &mut Vec<ResponderFailure>,
    ) -> ConsensusResult {
        let (proposals, proposal_failures) =
            self.collect_proposals(query, participants, debate, progress).await;
        info!("Received {} final proposals", proposals.len());
        failures.extend(proposal_failures);

        match decide(&proposals, &self.config) {
            None => ConsensusResult::fallback(
                debate,
                "No final proposals were received",
                self.config.fallback_confidence,
            ),
            Some(ClusterDecision::Majority(result)) => {
                info!(
                    "Majority reached with {} supporters",
                    result.solution.supporting_responders.len()
                );
                result
            }
            Some(ClusterDecision::Hybrid {
                text,
                distinct_approaches,
            }) => {
                info!(
                    "No majority among {} approaches; voting on a hybrid",
                    distinct_approaches
                );
                let (votes, ballot_failures) =
                    self.vote(query, participants, &text, progress).await;
                info!("Hybrid vote: {}", votes.vote_summary());
                failures.extend(ballot_failures);
                ConsensusResult::hybrid(
                    text,
                    votes.approvers(),
                    merge_insights(&proposals),
                    distinct_approaches,
                    participants.len(),
                )
            }
        }
    }

    async fn collect_proposals(
        &self,
        query: &Query,
        participants: &[Arc<dyn Responder>],
        debate: &DebateResult,
        progress: &dyn ProgressNotifier,
    ) -> (Vec<Proposal>, Vec<ResponderFailure>) {
        // the debate history is already part of the prompt
        let prompt = PromptTemplate::final_proposal_prompt(query.body(), &debate.rounds);

        let proposers = participants
            .iter()
            .filter(|r| debate.final_participants.iter().any(|id| id == r.id()));

        let calls = proposers.map(|responder| {
            let prompt = &prompt;
            async move {
                let result = self
                    .caller
                    .call(responder.as_ref(), prompt, None, self.call_timeout)
                    .await;
                progress.on_task_complete(&Phase::Consensus, responder.id(), result.is_ok());
                match result {
                    Ok(generation) => {
                        let reply = parse_proposal_response(&generation.text);
                        Ok(Proposal::new(responder.id(), reply.solution, reply.insights))
                    }
                    Err(e) => {
                        warn!("No proposal from {}: {}", responder.id(), e);
                        Err(ResponderFailure::new(
                            responder.id(),
                            format!("proposal failed: {}", e),
                        ))
                    }
                }
            }
        });

        let mut proposals = Vec::new();
        let mut failures = Vec::new();
        for settled in join_all(calls).await {
            match settled {
                Ok(proposal) => proposals.push(proposal),
                Err(failure) => failures.push(failure),
            }
        }
        (proposals, failures)
    }

    async fn vote(
        &self,
        query: &Query,
        participants: &[Arc<dyn Responder>],
        hybrid: &str,
        progress: &dyn ProgressNotifier,
    ) -> (VoteResult, Vec<ResponderFailure>) {
        let prompt = PromptTemplate::acceptance_prompt(query.body(), hybrid);

        let ballots = participants.iter().map(|responder| {
            let prompt = &prompt;
            async move {
                let result = self
                    .caller
                    .call(responder.as_ref(), prompt, None, self.call_timeout)
                    .await;
                progress.on_task_complete(&Phase::Consensus, responder.id(), result.is_ok());
                match result {
                    Ok(generation) => {
                        let (accepted, reasoning) = parse_acceptance_response(&generation.text);
                        (Vote::new(responder.id(), accepted, reasoning), None)
                    }
                    // a failed ballot counts as non-approval
                    Err(e) => {
                        let reason = format!("vote failed: {}", e);
                        (
                            Vote::reject(responder.id(), reason.clone()),
                            Some(ResponderFailure::new(responder.id(), reason)),
                        )
                    }
                }
            }
        });

        let (votes, failures): (Vec<Vote>, Vec<Option<ResponderFailure>>) =
            join_all(ballots).await.into_iter().unzip();
        (
            VoteResult::from_votes(votes, participants.len()),
            failures.into_iter().flatten().collect(),
        )
    }
}
