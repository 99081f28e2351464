//! Collect responses use case
//!
//! Asks every responder the query independently and in parallel, then
//! partitions the settled calls into outputs and failures.

use crate::ports::progress::ProgressNotifier;
use crate::ports::responder::Responder;
use crate::resilience::ResilientCaller;
use crate::use_cases::error::DeliberationError;
use crate::use_cases::shared::{PreparedCall, fan_out};
use deliberation_domain::{Phase, PromptTemplate, Query, ResponderFailure, ResponderOutput};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Successful outputs plus every recorded failure, both in responder order
#[derive(Debug, Clone)]
pub struct CollectionOutcome {
    pub responses: Vec<ResponderOutput>,
    pub failures: Vec<ResponderFailure>,
}

pub struct CollectResponsesUseCase {
    caller: ResilientCaller,
    call_timeout: Duration,
    min_successes: usize,
}

impl CollectResponsesUseCase {
    pub fn new(caller: ResilientCaller, call_timeout: Duration, min_successes: usize) -> Self {
        Self {
            caller,
            call_timeout,
            min_successes,
        }
    }

    /// Fails with [`DeliberationError::InsufficientResponses`] when fewer
    /// than the required number of responders succeed.
    pub async fn execute(
        &self,
        query: &Query,
        responders: &[Arc<dyn Responder>],
        progress: &dyn ProgressNotifier,
    ) -> Result<CollectionOutcome, DeliberationError> {
        if responders.is_empty() {
            return Err(DeliberationError::NoResponders);
        }

        let prompt = PromptTemplate::initial_query(query.body());
        let calls = responders
            .iter()
            .map(|responder| PreparedCall {
                responder: Arc::clone(responder),
                prompt: prompt.clone(),
                // each responder answers blind to its peers
                context: None,
            })
            .collect();

        let settled = fan_out(
            &self.caller,
            calls,
            self.call_timeout,
            &Phase::Collection,
            progress,
        )
        .await;

        let mut responses = Vec::new();
        let mut failures = Vec::new();
        for call in settled {
            match call.result {
                Ok(generation) => {
                    responses.push(ResponderOutput::from_generation(call.responder_id, generation))
                }
                Err(e) => failures.push(ResponderFailure::new(call.responder_id, e.to_string())),
            }
        }

        info!(
            "Collected {} responses ({} failed)",
            responses.len(),
            failures.len()
        );

        if responses.len() < self.min_successes {
            return Err(DeliberationError::InsufficientResponses {
                succeeded: responses.len(),
                required: self.min_successes,
                failures,
            });
        }

        Ok(CollectionOutcome {
            responses,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::ports::responder::ResponderError;
    use crate::testing::MockResponder;
    use deliberation_domain::ResilienceConfig;

    fn use_case() -> CollectResponsesUseCase {
        CollectResponsesUseCase::new(
            ResilientCaller::standalone(ResilienceConfig::default()),
            Duration::from_millis(100),
            2,
        )
    }

    #[tokio::test]
    async fn test_partial_failure_continues() {
        let responders = vec![
            MockResponder::answering("a", "Answer A").arc(),
            MockResponder::failing("b", ResponderError::Provider("down".into())).arc(),
            MockResponder::answering("c", "Answer C").arc(),
        ];
        let query = Query::new("Why?", "user");
        let outcome = use_case()
            .execute(&query, &responders, &NoProgress)
            .await
            .unwrap();

        let ids: Vec<_> = outcome.responses.iter().map(|r| r.responder_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].responder_id, "b");
        assert!(outcome.failures[0].error.contains("down"));
    }

    #[tokio::test]
    async fn test_outputs_attributed_regardless_of_completion_order() {
        let responders = vec![
            MockResponder::answering("slow", "from slow")
                .with_delay(Duration::from_millis(30))
                .arc(),
            MockResponder::answering("fast", "from fast").arc(),
        ];
        let query = Query::new("Why?", "user");
        let outcome = use_case()
            .execute(&query, &responders, &NoProgress)
            .await
            .unwrap();
        assert_eq!(outcome.responses[0].responder_id, "slow");
        assert_eq!(outcome.responses[0].text, "from slow");
        assert_eq!(outcome.responses[1].text, "from fast");
    }

    #[tokio::test]
    async fn test_single_success_is_insufficient() {
        let responders = vec![
            MockResponder::answering("a", "Answer A").arc(),
            MockResponder::failing("b", ResponderError::Provider("down".into())).arc(),
            MockResponder::answering("c", "late")
                .with_delay(Duration::from_millis(500))
                .arc(),
        ];
        let query = Query::new("Why?", "user");
        let err = use_case()
            .execute(&query, &responders, &NoProgress)
            .await
            .unwrap_err();

        match err {
            DeliberationError::InsufficientResponses {
                succeeded,
                failures,
                ..
            } => {
                assert_eq!(succeeded, 1);
                let ids: Vec<_> = failures.iter().map(|f| f.responder_id.as_str()).collect();
                assert_eq!(ids, vec!["b", "c"]);
                assert!(failures[1].error.contains("Timed out"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_responders_see_only_the_query() {
        let a = Arc::new(MockResponder::answering("a", "x"));
        let responders: Vec<Arc<dyn Responder>> =
            vec![a.clone(), MockResponder::answering("b", "y").arc()];
        let query = Query::new("What is ownership?", "user");
        use_case()
            .execute(&query, &responders, &NoProgress)
            .await
            .unwrap();
        let prompts = a.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("What is ownership?"));
    }
}
