//! Run debate use case
//!
//! Drives the round state machine: every active responder critiques its
//! peers, defends itself and may revise its position. A responder whose
//! call fails is dropped for the rest of the debate. The debate ends at
//! the round limit, or earlier once disagreement falls below the
//! convergence threshold.

use crate::ports::progress::ProgressNotifier;
use crate::ports::responder::Responder;
use crate::resilience::ResilientCaller;
use crate::use_cases::error::DeliberationError;
use crate::use_cases::shared::{PreparedCall, fan_out};
use deliberation_domain::debate::{disagreement_level, should_terminate};
use deliberation_domain::{
    AnalysisReport, DebateConfig, DebateResult, DebateRound, Exchange, GenerationContext, Phase,
    PromptTemplate, Query, ResponderFailure, ResponderOutput, parse_debate_response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Input for the RunDebate use case
pub struct DebateInput<'a> {
    pub query: &'a Query,
    /// Responders in the same order as `initial_responses`
    pub responders: &'a [Arc<dyn Responder>],
    pub initial_responses: &'a [ResponderOutput],
    pub analysis: &'a AnalysisReport,
}

/// The finished debate plus the calls that failed along the way
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    pub result: DebateResult,
    pub failures: Vec<ResponderFailure>,
}

pub struct RunDebateUseCase {
    caller: ResilientCaller,
    config: DebateConfig,
    call_timeout: Duration,
}

impl RunDebateUseCase {
    pub fn new(caller: ResilientCaller, config: DebateConfig, call_timeout: Duration) -> Self {
        Self {
            caller,
            config,
            call_timeout,
        }
    }

    pub async fn execute(
        &self,
        input: DebateInput<'_>,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateOutcome, DeliberationError> {
        let initial = Self::pair_initial_responses(&input)?;
        let started = Instant::now();

        // latest position per responder id, seeded with the first answers
        let mut latest: HashMap<String, String> = initial
            .iter()
            .map(|(id, text)| (id.clone(), text.clone()))
            .collect();
        let mut active: Vec<usize> = (0..input.responders.len()).collect();
        let mut rounds: Vec<DebateRound> = Vec::new();
        let mut failures = Vec::new();

        for round in 1..=self.config.max_rounds {
            let entering = active.clone();
            info!("Debate round {} with {} responders", round, entering.len());

            let calls = entering
                .iter()
                .map(|&i| self.prepare_call(&input, i, round, &initial, &latest, &entering, &rounds))
                .collect();
            let settled = fan_out(
                &self.caller,
                calls,
                self.call_timeout,
                &Phase::Debate,
                progress,
            )
            .await;

            let mut exchanges = Vec::new();
            let mut round_failures = Vec::new();
            for (call, &index) in settled.into_iter().zip(&entering) {
                match call.result {
                    Ok(generation) => {
                        let reply = parse_debate_response(&generation.text);
                        let exchange = Exchange::new(
                            call.responder_id.clone(),
                            reply.critique,
                            reply.defense,
                            reply.revised_position,
                        );
                        latest.insert(call.responder_id, exchange.latest_position().to_string());
                        exchanges.push(exchange);
                    }
                    Err(e) => {
                        warn!(
                            "Dropping {} from the debate after round {}: {}",
                            call.responder_id, round, e
                        );
                        active.retain(|&a| a != index);
                        round_failures.push(ResponderFailure::new(call.responder_id, e.to_string()));
                    }
                }
            }

            failures.extend(round_failures);
            if exchanges.is_empty() {
                return Err(DeliberationError::DebateStalled { round, failures });
            }

            // with fewer than two survivors, measure across everyone who entered
            let measured = if active.len() >= 2 { &active } else { &entering };
            let positions: Vec<&str> = measured
                .iter()
                .filter_map(|&i| latest.get(input.responders[i].id()).map(String::as_str))
                .collect();
            let disagreement = disagreement_level(&positions, self.config.min_token_len);
            debug!("Round {} disagreement: {:.3}", round, disagreement);

            rounds.push(DebateRound::new(round, exchanges, disagreement));
            progress.on_debate_round(round, disagreement);

            if active.len() < 2 {
                info!("Debate ended after round {}: fewer than 2 active responders", round);
                break;
            }
            if should_terminate(round, disagreement, &self.config) {
                info!("Debate ended after round {} (disagreement {:.3})", round, disagreement);
                break;
            }
        }

        let final_participants = active
            .iter()
            .map(|&i| input.responders[i].id().to_string())
            .collect();
        let result = DebateResult::new(
            rounds,
            started.elapsed().as_millis() as u64,
            final_participants,
        );
        Ok(DebateOutcome { result, failures })
    }

    /// Check the 1:1 responder/response correspondence and return each
    /// responder's first answer in responder order.
    fn pair_initial_responses(
        input: &DebateInput<'_>,
    ) -> Result<Vec<(String, String)>, DeliberationError> {
        let responders = input.responders.len();
        let responses = input.initial_responses.len();
        if responders != responses {
            return Err(DeliberationError::MismatchedResponses {
                responders,
                responses,
            });
        }
        if responders < 2 {
            return Err(DeliberationError::InsufficientDebateParticipants(responders));
        }

        input
            .responders
            .iter()
            .map(|responder| {
                input
                    .initial_responses
                    .iter()
                    .find(|r| r.responder_id == responder.id())
                    .map(|r| (r.responder_id.clone(), r.text.clone()))
                    .ok_or(DeliberationError::MismatchedResponses {
                        responders,
                        responses,
                    })
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn prepare_call(
        &self,
        input: &DebateInput<'_>,
        index: usize,
        round: usize,
        initial: &[(String, String)],
        latest: &HashMap<String, String>,
        active: &[usize],
        history: &[DebateRound],
    ) -> PreparedCall {
        let responder = &input.responders[index];
        let peers: Vec<(String, String)> = active
            .iter()
            .filter(|&&i| i != index)
            .filter_map(|&i| {
                let id = input.responders[i].id();
                latest.get(id).map(|text| (id.to_string(), text.clone()))
            })
            .collect();

        // peers and analysis are in the prompt; only earlier rounds ride along
        let prompt = PromptTemplate::debate_prompt(
            input.query.body(),
            round,
            &initial[index].1,
            &peers,
            Some(input.analysis),
        );
        let context = (!history.is_empty())
            .then(|| GenerationContext::default().with_history(history.to_vec()));

        PreparedCall {
            responder: Arc::clone(responder),
            prompt,
            context,
        }
    }
}
