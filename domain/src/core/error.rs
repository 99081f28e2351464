//! Domain error types

use crate::orchestration::entities::SessionStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid responder: {0}")]
    InvalidResponder(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Illegal session transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
}

impl DomainError {
    /// Shorthand for a configuration error on a single field
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
