//! Responder port
//!
//! The single capability the pipeline needs from an AI responder:
//! generate a reply to a prompt, optionally with extra context.

use async_trait::async_trait;
use deliberation_domain::{Generation, GenerationContext, ResponderInfo};
use std::time::Duration;
use thiserror::Error;

/// Errors a responder call can end with
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponderError {
    #[error("Timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Circuit open for responder {0}")]
    CircuitOpen(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ResponderError {
    /// Whether a retry might succeed.
    ///
    /// Only rate limiting qualifies, whether signalled by variant or by a
    /// provider message mentioning `429`, `rate limit` or `quota exceeded`.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResponderError::RateLimited(_) => true,
            ResponderError::Provider(msg)
            | ResponderError::Transport(msg)
            | ResponderError::InvalidResponse(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("429") || msg.contains("rate limit") || msg.contains("quota exceeded")
            }
            ResponderError::Timeout(_) | ResponderError::CircuitOpen(_) => false,
        }
    }
}

/// An AI responder.
///
/// Implementations (adapters) live in the infrastructure layer; tests
/// use scripted mocks.
#[async_trait]
pub trait Responder: Send + Sync {
    fn info(&self) -> &ResponderInfo;

    fn id(&self) -> &str {
        &self.info().id
    }

    /// Generate a reply. `context` is passed through untouched; adapters
    /// may use it to enrich the prompt.
    async fn generate(
        &self,
        prompt: &str,
        context: Option<&GenerationContext>,
    ) -> Result<Generation, ResponderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_retryable() {
        assert!(ResponderError::RateLimited("slow down".into()).is_retryable());
        assert!(ResponderError::Provider("HTTP 429 Too Many Requests".into()).is_retryable());
        assert!(ResponderError::Provider("Rate Limit reached".into()).is_retryable());
        assert!(ResponderError::Transport("quota exceeded for key".into()).is_retryable());
    }

    #[test]
    fn test_other_errors_are_not_retryable() {
        assert!(!ResponderError::Provider("model overloaded".into()).is_retryable());
        assert!(!ResponderError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!ResponderError::CircuitOpen("a".into()).is_retryable());
    }

    #[test]
    fn test_timeout_display() {
        let err = ResponderError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Timed out after 30s");
    }
}
