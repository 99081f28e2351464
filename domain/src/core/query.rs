//! Query value object

use crate::util::now_millis;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question posed to the responders (Value Object)
///
/// Created once at the boundary and never mutated. Carries the owning
/// user and an optional explicit responder selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    id: String,
    body: String,
    user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    responder_ids: Option<Vec<String>>,
    created_at: u64,
}

impl Query {
    /// Create a new query with a fresh id
    ///
    /// # Panics
    /// Panics if the body is empty or only whitespace
    pub fn new(body: impl Into<String>, user_id: impl Into<String>) -> Self {
        let body = body.into();
        assert!(!body.trim().is_empty(), "Query cannot be empty");
        Self::build(body, user_id.into())
    }

    /// Try to create a new query, returning None if the body is blank
    pub fn try_new(body: impl Into<String>, user_id: impl Into<String>) -> Option<Self> {
        let body = body.into();
        if body.trim().is_empty() {
            None
        } else {
            Some(Self::build(body, user_id.into()))
        }
    }

    fn build(body: String, user_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            body,
            user_id,
            responder_ids: None,
            created_at: now_millis(),
        }
    }

    /// Restrict the query to an explicit set of responders
    pub fn with_responders(mut self, ids: Vec<String>) -> Self {
        self.responder_ids = if ids.is_empty() { None } else { Some(ids) };
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the question text
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Explicit responder selection, if the caller made one
    pub fn responder_ids(&self) -> Option<&[String]> {
        self.responder_ids.as_deref()
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.body)
    }
}
