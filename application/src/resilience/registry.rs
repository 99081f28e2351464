//! Process-wide circuit breakers keyed by responder id

use deliberation_domain::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::warn;

/// One breaker per responder id, created on first use.
///
/// Shared by every use case of a process through an `Arc`. The lock is
/// never held across an await.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    config: CircuitBreakerConfig,
    breakers: Mutex<HashMap<String, CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            breakers: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CircuitBreaker>> {
        self.breakers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_breaker<T>(&self, id: &str, f: impl FnOnce(&mut CircuitBreaker) -> T) -> T {
        let mut breakers = self.lock();
        let breaker = breakers
            .entry(id.to_string())
            .or_insert_with(|| CircuitBreaker::new(self.config.clone()));
        f(breaker)
    }

    /// Whether a call to `id` may proceed now.
    pub fn try_acquire(&self, id: &str) -> bool {
        self.with_breaker(id, |b| b.try_acquire(Instant::now()))
    }

    pub fn record_success(&self, id: &str) {
        self.with_breaker(id, |b| b.record_success());
    }

    pub fn record_failure(&self, id: &str) {
        let opened = self.with_breaker(id, |b| {
            let before = b.state();
            b.record_failure(Instant::now());
            before != CircuitState::Open && b.state() == CircuitState::Open
        });
        if opened {
            warn!("Circuit opened for responder {}", id);
        }
    }

    pub fn state(&self, id: &str) -> CircuitState {
        self.lock()
            .get(id)
            .map(|b| b.state())
            .unwrap_or(CircuitState::Closed)
    }

    /// Forget every breaker.
    pub fn reset(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakers_are_per_responder() {
        let registry = CircuitBreakerRegistry::new(CircuitBreakerConfig {
            failure_threshold: 1,
            ..Default::default()
        });
        registry.record_failure("a");
        assert_eq!(registry.state("a"), CircuitState::Open);
        assert_eq!(registry.state("b"), CircuitState::Closed);
        assert!(!registry.try_acquire("a"));
        assert!(registry.try_acquire("b"));
    }

    #[test]
    fn test_reset_clears_state() {
        let registry = CircuitBreakerRegistry::new(CircuitBreakerConfig {
            failure_threshold: 1,
            ..Default::default()
        });
        registry.record_failure("a");
        registry.reset();
        assert!(registry.try_acquire("a"));
    }
}
