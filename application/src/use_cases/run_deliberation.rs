//! Run deliberation use case
//!
//! Orchestrates the full multi-phase flow for one query:
//!
//! ```text
//! pending ─▶ collecting ─▶ analyzing ─▶ debating ─▶ consensus ─▶ completed
//!    └───────────┴─────────────┴────────────┴───────────┴──▶ failed
//! ```
//!
//! Each phase's output is persisted, and the status advanced, before the
//! next phase starts. Only responders whose collection call succeeded
//! take part in the later phases.

use crate::config::DeliberationParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, PhaseUpdate, ProgressNotifier};
use crate::ports::responder::Responder;
use crate::ports::session_store::SessionStore;
use crate::resilience::ResilientCaller;
use crate::use_cases::analyze_responses::AnalyzeResponsesUseCase;
use crate::use_cases::build_consensus::BuildConsensusUseCase;
use crate::use_cases::collect_responses::{CollectResponsesUseCase, CollectionOutcome};
use crate::use_cases::error::DeliberationError;
use crate::use_cases::run_debate::{DebateInput, RunDebateUseCase};
use deliberation_domain::{
    AnalysisEngine, Phase, Query, Session, SessionMode, SessionStatus, SessionUpdate,
};
use serde_json::json;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{info, warn};

/// Input for the RunDeliberation use case
pub struct DeliberationInput {
    pub query: Query,
    /// Already-resolved responders, in a stable order
    pub responders: Vec<Arc<dyn Responder>>,
}

impl DeliberationInput {
    pub fn new(query: Query, responders: Vec<Arc<dyn Responder>>) -> Self {
        Self { query, responders }
    }
}

/// Result handed back to the caller
#[derive(Debug, Clone)]
pub struct DeliberationOutput {
    pub session_id: String,
    pub result_text: String,
    pub session: Session,
}

/// Use case for running a full deliberation
pub struct RunDeliberationUseCase {
    store: Arc<dyn SessionStore>,
    params: DeliberationParams,
    caller: ResilientCaller,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunDeliberationUseCase {
    pub fn new(
        store: Arc<dyn SessionStore>,
        params: DeliberationParams,
        caller: ResilientCaller,
    ) -> Self {
        Self {
            store,
            params,
            caller,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: DeliberationInput,
    ) -> Result<DeliberationOutput, DeliberationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: DeliberationInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DeliberationOutput, DeliberationError> {
        self.validate(&input)?;

        let session = self
            .store
            .create_session(&input.query, SessionMode::Multi)
            .await?;
        let session_timeout = self.params.session_timeout_for(input.responders.len());
        info!(
            "Starting deliberation {} with {} responders (timeout {:?})",
            session.id,
            input.responders.len(),
            session_timeout
        );

        let outcome = match timeout(
            session_timeout,
            self.run_phases(&session.id, &input, progress),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DeliberationError::SessionTimeout(session_timeout)),
        };

        match outcome {
            Ok(output) => Ok(output),
            Err(e) => {
                self.mark_failed(&session.id, &e).await;
                Err(e)
            }
        }
    }

    /// Structural checks made before any remote call
    fn validate(&self, input: &DeliberationInput) -> Result<(), DeliberationError> {
        self.params.validate()?;
        let count = input.responders.len();
        if count == 0 {
            return Err(DeliberationError::NoResponders);
        }
        if count < self.params.min_responders || count > self.params.max_responders {
            return Err(DeliberationError::InvalidResponderCount {
                min: self.params.min_responders,
                max: self.params.max_responders,
                actual: count,
            });
        }
        Ok(())
    }

    async fn run_phases(
        &self,
        session_id: &str,
        input: &DeliberationInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DeliberationOutput, DeliberationError> {
        let query = &input.query;

        // Phase 1: Collection
        self.advance(session_id, SessionUpdate::status(Phase::Collection.status()))
            .await?;
        progress.on_phase_start(&Phase::Collection, session_id, input.responders.len());
        let collection = CollectResponsesUseCase::new(
            self.caller.clone(),
            self.params.collection_timeout,
            self.params.min_successful_responses,
        )
        .execute(query, &input.responders, progress)
        .await?;
        self.log_collection(&collection);
        progress.on_phase_complete(
            &Phase::Collection,
            session_id,
            &PhaseUpdate::Collected {
                succeeded: collection.responses.len(),
                failed: collection.failures.len(),
            },
        );
        self.advance(
            session_id,
            SessionUpdate::status(Phase::Analysis.status())
                .with_responses(collection.responses.clone())
                .with_failures(collection.failures.clone()),
        )
        .await?;

        // failed responders are out of the rest of the pipeline
        let survivors: Vec<Arc<dyn Responder>> = collection
            .responses
            .iter()
            .filter_map(|output| {
                input
                    .responders
                    .iter()
                    .find(|r| r.id() == output.responder_id)
                    .cloned()
            })
            .collect();

        // Phase 2: Analysis
        progress.on_phase_start(&Phase::Analysis, session_id, collection.responses.len());
        let analysis = AnalyzeResponsesUseCase::new(
            AnalysisEngine::new(self.params.analysis.clone()),
            self.params.analysis_timeout,
        )
        .execute(collection.responses.clone())
        .await;
        self.conversation_logger.log(ConversationEvent::new(
            "analysis_complete",
            json!({
                "themes": analysis.common_themes.len(),
                "differences": analysis.differences.len(),
                "timed_out": analysis.timed_out,
                "summary": analysis.summary,
            }),
        ));
        progress.on_phase_complete(
            &Phase::Analysis,
            session_id,
            &PhaseUpdate::Analyzed {
                themes: analysis.common_themes.len(),
                differences: analysis.differences.len(),
                timed_out: analysis.timed_out,
            },
        );
        self.advance(
            session_id,
            SessionUpdate::status(Phase::Debate.status()).with_analysis(analysis.clone()),
        )
        .await?;

        // Phase 3: Debate
        progress.on_phase_start(&Phase::Debate, session_id, survivors.len());
        let debate = RunDebateUseCase::new(
            self.caller.clone(),
            self.params.debate.clone(),
            self.params.call_timeout,
        )
        .execute(
            DebateInput {
                query,
                responders: &survivors,
                initial_responses: &collection.responses,
                analysis: &analysis,
            },
            progress,
        )
        .await?;
        for round in &debate.result.rounds {
            self.conversation_logger.log(ConversationEvent::new(
                "debate_round",
                json!({
                    "round": round.round,
                    "disagreement": round.disagreement_level,
                    "exchanges": round.exchanges,
                }),
            ));
        }
        for failure in &debate.failures {
            self.log_failure(&Phase::Debate, &failure.responder_id, &failure.error);
        }
        progress.on_phase_complete(
            &Phase::Debate,
            session_id,
            &PhaseUpdate::Debated {
                rounds: debate.result.round_count(),
                disagreement: 1.0 - debate.result.convergence_score,
            },
        );
        self.advance(
            session_id,
            SessionUpdate::status(Phase::Consensus.status())
                .with_debate(debate.result.clone())
                .with_failures(debate.failures.clone()),
        )
        .await?;

        // Phase 4: Consensus
        progress.on_phase_start(&Phase::Consensus, session_id, survivors.len());
        let consensus = BuildConsensusUseCase::new(
            self.caller.clone(),
            self.params.consensus.clone(),
            self.params.consensus_timeout,
            self.params.call_timeout,
        )
        .execute(query, &survivors, &debate.result, progress)
        .await;
        for failure in &consensus.failures {
            self.log_failure(&Phase::Consensus, &failure.responder_id, &failure.error);
        }
        let consensus_failures = consensus.failures;
        let consensus = consensus.result;
        self.conversation_logger.log(ConversationEvent::new(
            "consensus_reached",
            json!({
                "method": consensus.method,
                "agreement_level": consensus.agreement_level,
                "supporters": consensus.solution.supporting_responders,
                "rationale": consensus.rationale,
            }),
        ));
        progress.on_phase_complete(
            &Phase::Consensus,
            session_id,
            &PhaseUpdate::Agreed {
                agreement_level: consensus.agreement_level,
                method: consensus.method,
            },
        );

        let result_text = consensus.solution.text.clone();
        let session = self
            .advance(
                session_id,
                SessionUpdate::status(SessionStatus::Completed)
                    .with_consensus(consensus)
                    .with_failures(consensus_failures)
                    .with_result_text(result_text.clone()),
            )
            .await?;

        info!("Deliberation {} completed", session_id);
        Ok(DeliberationOutput {
            session_id: session_id.to_string(),
            result_text,
            session,
        })
    }

    async fn advance(
        &self,
        session_id: &str,
        update: SessionUpdate,
    ) -> Result<Session, DeliberationError> {
        Ok(self.store.update_session(session_id, update).await?)
    }

    /// Persist the failure; the original error is what the caller sees.
    ///
    /// Failures carried by the error were not stored yet and are appended
    /// to those recorded by earlier phases.
    async fn mark_failed(&self, session_id: &str, error: &DeliberationError) {
        warn!("Deliberation {} failed: {}", session_id, error);
        let failures = error.failures();
        self.conversation_logger.log(ConversationEvent::new(
            "session_failed",
            json!({
                "session_id": session_id,
                "error": error.to_string(),
                "failures": failures,
            }),
        ));
        let mut update = SessionUpdate::failed(error.to_string());
        if !failures.is_empty() {
            update = update.with_failures(failures);
        }
        if let Err(e) = self.store.update_session(session_id, update).await {
            warn!("Could not mark session {} failed: {}", session_id, e);
        }
    }

    fn log_collection(&self, collection: &CollectionOutcome) {
        for output in &collection.responses {
            self.conversation_logger.log(ConversationEvent::new(
                "responder_output",
                json!({
                    "phase": Phase::Collection.as_str(),
                    "responder": output.responder_id,
                    "tokens": output.token_count,
                    "latency_ms": output.latency_ms,
                    "text": output.text,
                }),
            ));
        }
        for failure in &collection.failures {
            self.log_failure(&Phase::Collection, &failure.responder_id, &failure.error);
        }
    }

    fn log_failure(&self, phase: &Phase, responder_id: &str, error: &str) {
        self.conversation_logger.log(ConversationEvent::new(
            "responder_failure",
            json!({
                "phase": phase.as_str(),
                "responder": responder_id,
                "error": error,
            }),
        ));
    }
}
