//! Session store port
//!
//! The only durable shared resource. The pipeline creates one session per
//! query and writes partial updates after each phase, so readers can
//! watch a deliberation progress.

use async_trait::async_trait;
use deliberation_domain::{DomainError, Query, Session, SessionMode, SessionUpdate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session update rejected: {0}")]
    Rejected(#[from] DomainError),

    #[error("Session store error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a pending session for `query`.
    async fn create_session(&self, query: &Query, mode: SessionMode)
    -> Result<Session, StoreError>;

    /// Apply a partial update and return the session as stored.
    ///
    /// An update whose status is not a legal successor of the stored
    /// status is rejected and leaves the session unchanged.
    async fn update_session(&self, id: &str, update: SessionUpdate)
    -> Result<Session, StoreError>;

    /// `None` when no session has this id.
    async fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError>;
}
