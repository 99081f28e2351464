//! Run direct use case.
//!
//! Executes a single-responder answer with no analysis, debate or
//! consensus. The session goes `pending → collecting → completed`, or
//! `failed` when the one call fails.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, PhaseUpdate, ProgressNotifier};
use crate::ports::responder::Responder;
use crate::ports::session_store::SessionStore;
use crate::resilience::ResilientCaller;
use crate::use_cases::error::DeliberationError;
use crate::use_cases::run_deliberation::DeliberationOutput;
use deliberation_domain::{
    Phase, PromptTemplate, Query, ResponderFailure, ResponderOutput, SessionMode, SessionStatus,
    SessionUpdate,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Use case for answering with one responder
pub struct RunDirectUseCase {
    store: Arc<dyn SessionStore>,
    caller: ResilientCaller,
    call_timeout: Duration,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunDirectUseCase {
    pub fn new(store: Arc<dyn SessionStore>, caller: ResilientCaller, call_timeout: Duration) -> Self {
        Self {
            store,
            caller,
            call_timeout,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub async fn execute(
        &self,
        query: Query,
        responder: Arc<dyn Responder>,
    ) -> Result<DeliberationOutput, DeliberationError> {
        self.execute_with_progress(query, responder, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        query: Query,
        responder: Arc<dyn Responder>,
        progress: &dyn ProgressNotifier,
    ) -> Result<DeliberationOutput, DeliberationError> {
        let session = self.store.create_session(&query, SessionMode::Single).await?;
        info!("Direct answer from {} for session {}", responder.id(), session.id);

        self.store
            .update_session(&session.id, SessionUpdate::status(SessionStatus::Collecting))
            .await?;
        progress.on_phase_start(&Phase::Collection, &session.id, 1);

        let prompt = PromptTemplate::initial_query(query.body());
        let result = self
            .caller
            .call(responder.as_ref(), &prompt, None, self.call_timeout)
            .await;
        progress.on_task_complete(&Phase::Collection, responder.id(), result.is_ok());

        match result {
            Ok(generation) => {
                let output = ResponderOutput::from_generation(responder.id(), generation);
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
                progress.on_phase_complete(
                    &Phase::Collection,
                    &session.id,
                    &PhaseUpdate::Collected {
                        succeeded: 1,
                        failed: 0,
                    },
                );
                let result_text = output.text.clone();
                let session = self
                    .store
                    .update_session(
                        &session.id,
                        SessionUpdate::status(SessionStatus::Completed)
                            .with_responses(vec![output])
                            .with_result_text(result_text.clone()),
                    )
                    .await?;
                Ok(DeliberationOutput {
                    session_id: session.id.clone(),
                    result_text,
                    session,
                })
            }
            Err(e) => {
                let error = DeliberationError::Responder {
                    responder_id: responder.id().to_string(),
                    source: e,
                };
                warn!("Direct answer failed: {}", error);
                self.conversation_logger.log(ConversationEvent::new(
                    "session_failed",
                    json!({
                        "session_id": session.id,
                        "error": error.to_string(),
                    }),
                ));
                let failure = ResponderFailure::new(responder.id(), error.to_string());
                self.store
                    .update_session(
                        &session.id,
                        SessionUpdate::failed(error.to_string()).with_failures(vec![failure]),
                    )
                    .await?;
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::responder::ResponderError;
    use crate::testing::{MockResponder, RecordingStore};
    use deliberation_domain::ResilienceConfig;

    fn use_case(store: Arc<RecordingStore>) -> RunDirectUseCase {
        RunDirectUseCase::new(
            store,
            ResilientCaller::standalone(ResilienceConfig::default()),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let store = Arc::new(RecordingStore::default());
        let output = use_case(store.clone())
            .execute(
                Query::new("What is 2 + 2?", "u"),
                MockResponder::answering("solo", "4").arc(),
            )
            .await
            .unwrap();

        assert_eq!(output.result_text, "4");
        assert_eq!(output.session.mode, SessionMode::Single);
        assert_eq!(output.session.responses.len(), 1);
        assert_eq!(
            store.statuses(),
            vec![
                SessionStatus::Pending,
                SessionStatus::Collecting,
                SessionStatus::Completed
            ]
        );
    }

    #[tokio::test]
    async fn test_direct_failure_marks_session_failed() {
        let store = Arc::new(RecordingStore::default());
        let err = use_case(store.clone())
            .execute(
                Query::new("Q?", "u"),
                MockResponder::failing("solo", ResponderError::Provider("down".into())).arc(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DeliberationError::Responder { .. }));
        assert_eq!(store.statuses().last(), Some(&SessionStatus::Failed));
    }
}
