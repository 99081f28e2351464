//! Resilience policy: circuit breaking and retry scheduling.
//!
//! Only the state machines and schedules live here; the async wrapper
//! that applies them to responder calls is in the application layer.

pub mod circuit_breaker;
pub mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::RetryPolicy;

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Policy applied around every remote responder call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    pub retry: RetryPolicy,
    pub circuit_breaker: CircuitBreakerConfig,
    /// Independent bound on the whole wrapped call, retries included
    pub call_timeout_secs: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            call_timeout_secs: 30,
        }
    }
}

impl ResilienceConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.retry.max_attempts == 0 {
            return Err(DomainError::config(
                "resilience.retry.max_attempts",
                "must be at least 1",
            ));
        }
        if self.retry.multiplier < 1.0 {
            return Err(DomainError::config(
                "resilience.retry.multiplier",
                "must be at least 1.0",
            ));
        }
        if self.circuit_breaker.failure_threshold == 0 {
            return Err(DomainError::config(
                "resilience.circuit_breaker.failure_threshold",
                "must be at least 1",
            ));
        }
        if self.circuit_breaker.success_threshold == 0 {
            return Err(DomainError::config(
                "resilience.circuit_breaker.success_threshold",
                "must be at least 1",
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(DomainError::config(
                "resilience.call_timeout_secs",
                "must be positive",
            ));
        }
        Ok(())
    }
}
