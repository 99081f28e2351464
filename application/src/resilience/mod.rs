//! Resilience wrapper around responder calls.
//!
//! Every remote call goes through [`ResilientCaller::call`], which nests,
//! from the outside in:
//!
//! 1. the responder's circuit breaker (fail fast while open)
//! 2. an overall wrapper timeout
//! 3. retry with exponential backoff for rate-limit errors
//! 4. a per-attempt timeout supplied by the calling phase
//!
//! Timeouts stop waiting; they do not cancel work inside the provider.

pub mod registry;
pub mod retry;

pub use registry::CircuitBreakerRegistry;
pub use retry::retry_with_backoff;

use crate::ports::responder::{Responder, ResponderError};
use deliberation_domain::{Generation, GenerationContext, ResilienceConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ResilientCaller {
    config: ResilienceConfig,
    breakers: Arc<CircuitBreakerRegistry>,
}

impl ResilientCaller {
    pub fn new(config: ResilienceConfig, breakers: Arc<CircuitBreakerRegistry>) -> Self {
        Self { config, breakers }
    }

    /// A caller with its own breaker registry built from `config`.
    pub fn standalone(config: ResilienceConfig) -> Self {
        let breakers = Arc::new(CircuitBreakerRegistry::new(config.circuit_breaker.clone()));
        Self::new(config, breakers)
    }

    pub fn breakers(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breakers
    }

    /// Call `responder` with the full resilience policy.
    ///
    /// `attempt_timeout` bounds each single attempt.
    pub async fn call(
        &self,
        responder: &dyn Responder,
        prompt: &str,
        context: Option<&GenerationContext>,
        attempt_timeout: Duration,
    ) -> Result<Generation, ResponderError> {
        let id = responder.id();
        if !self.breakers.try_acquire(id) {
            debug!("Rejecting call to {}: circuit open", id);
            return Err(ResponderError::CircuitOpen(id.to_string()));
        }

        let attempts = retry_with_backoff(&self.config.retry, |attempt| async move {
            debug!("Calling {} (attempt {})", id, attempt);
            timeout(attempt_timeout, responder.generate(prompt, context))
                .await
                .unwrap_or(Err(ResponderError::Timeout(attempt_timeout)))
        });

        let wrapper_timeout = self.config.call_timeout();
        let result = timeout(wrapper_timeout, attempts)
            .await
            .unwrap_or(Err(ResponderError::Timeout(wrapper_timeout)));

        match &result {
            Ok(_) => self.breakers.record_success(id),
            Err(_) => self.breakers.record_failure(id),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockResponder;
    use deliberation_domain::{CircuitBreakerConfig, CircuitState, RetryPolicy};

    fn config(failure_threshold: u32) -> ResilienceConfig {
        ResilienceConfig {
            retry: RetryPolicy {
                max_attempts: 2,
                initial_delay_ms: 1,
                multiplier: 2.0,
                max_delay_ms: 2,
            },
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold,
                reset_timeout_secs: 60,
                success_threshold: 1,
            },
            call_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let caller = ResilientCaller::standalone(config(5));
        let responder = MockResponder::answering("a", "hello");
        let generation = caller
            .call(&responder, "prompt", None, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(generation.text, "hello");
        assert_eq!(responder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_attempt_timeout() {
        let caller = ResilientCaller::standalone(config(5));
        let responder =
            MockResponder::answering("slow", "late").with_delay(Duration::from_millis(200));
        let result = caller
            .call(&responder, "prompt", None, Duration::from_millis(20))
            .await;
        assert_eq!(result, Err(ResponderError::Timeout(Duration::from_millis(20))));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let caller = ResilientCaller::standalone(config(5));
        let responder = MockResponder::with_handler("a", |_, call| {
            if call == 1 {
                Err(ResponderError::RateLimited("429".into()))
            } else {
                Ok("second time".into())
            }
        });
        let generation = caller
            .call(&responder, "prompt", None, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(generation.text, "second time");
        assert_eq!(responder.call_count(), 2);
    }

    #[tokio::test]
    async fn test_open_circuit_fails_fast() {
        let caller = ResilientCaller::standalone(config(2));
        let responder = MockResponder::failing("bad", ResponderError::Provider("boom".into()));

        for _ in 0..2 {
            assert!(caller
                .call(&responder, "p", None, Duration::from_secs(1))
                .await
                .is_err());
        }
        assert_eq!(caller.breakers().state("bad"), CircuitState::Open);

        let result = caller.call(&responder, "p", None, Duration::from_secs(1)).await;
        assert_eq!(result, Err(ResponderError::CircuitOpen("bad".into())));
        assert_eq!(responder.call_count(), 2);
    }
}
