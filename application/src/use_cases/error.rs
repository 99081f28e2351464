//! Errors that end a deliberation

use crate::ports::responder::ResponderError;
use crate::ports::session_store::StoreError;
use deliberation_domain::{DomainError, ResponderFailure};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliberationError {
    #[error("No responders available")]
    NoResponders,

    #[error("A deliberation needs between {min} and {max} responders, got {actual}")]
    InvalidResponderCount {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error(
        "Only {succeeded} of the {required} required responses were collected; failures: {}",
        list_failures(.failures)
    )]
    InsufficientResponses {
        succeeded: usize,
        required: usize,
        failures: Vec<ResponderFailure>,
    },

    #[error("Debate needs one initial response per responder ({responders} responders, {responses} responses)")]
    MismatchedResponses { responders: usize, responses: usize },

    #[error("Debate needs at least 2 participants, got {0}")]
    InsufficientDebateParticipants(usize),

    #[error("Every active responder failed in debate round {round}; failures: {}", list_failures(.failures))]
    DebateStalled {
        round: usize,
        failures: Vec<ResponderFailure>,
    },

    #[error("Session timed out after {}s", .0.as_secs())]
    SessionTimeout(Duration),

    #[error("Responder {responder_id} failed: {source}")]
    Responder {
        responder_id: String,
        source: ResponderError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] DomainError),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

impl DeliberationError {
    /// Per-responder failures carried by the error, for diagnosis
    pub fn failures(&self) -> Vec<ResponderFailure> {
        match self {
            DeliberationError::InsufficientResponses { failures, .. }
            | DeliberationError::DebateStalled { failures, .. } => failures.clone(),
            DeliberationError::Responder {
                responder_id,
                source,
            } => vec![ResponderFailure::new(responder_id, source.to_string())],
            _ => Vec::new(),
        }
    }
}

fn list_failures(failures: &[ResponderFailure]) -> String {
    if failures.is_empty() {
        return "none".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
