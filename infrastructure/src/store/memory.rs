//! In-memory session store.
//!
//! Sessions live for the lifetime of the process. Good enough for the
//! one-shot CLI; a persistent backend only needs to implement the same
//! [`SessionStore`] port.

use async_trait::async_trait;
use deliberation_application::{SessionStore, StoreError};
use deliberation_domain::{Query, Session, SessionMode, SessionUpdate};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, query: &Query, mode: SessionMode) -> Result<Session, StoreError> {
        let session = Session::new(query.clone(), mode);
        debug!("Created {} session {}", mode, session.id);
        self.lock().insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn update_session(&self, id: &str, update: SessionUpdate) -> Result<Session, StoreError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        session.apply(update)?;
        Ok(session.clone())
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.lock().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberation_domain::{ResponderOutput, SessionStatus};

    #[tokio::test]
    async fn test_create_update_get() {
        let store = InMemorySessionStore::new();
        let query = Query::new("Q?", "alice");
        let session = store.create_session(&query, SessionMode::Multi).await.unwrap();
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.user_id, "alice");
        assert_eq!(store.len(), 1);

        let updated = store
            .update_session(
                &session.id,
                SessionUpdate::status(SessionStatus::Collecting)
                    .with_responses(vec![ResponderOutput::new("a", "answer")]),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, SessionStatus::Collecting);
        assert!(updated.updated_at >= session.updated_at);

        let fetched = store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(fetched.responses.len(), 1);
        assert!(fetched.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_terminal_status_stamps_completion() {
        let store = InMemorySessionStore::new();
        let session = store
            .create_session(&Query::new("Q?", "u"), SessionMode::Single)
            .await
            .unwrap();
        let failed = store
            .update_session(&session.id, SessionUpdate::failed("boom"))
            .await
            .unwrap();
        assert_eq!(failed.status, SessionStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(failed.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let store = InMemorySessionStore::new();
        assert!(matches!(
            store
                .update_session("missing", SessionUpdate::status(SessionStatus::Collecting))
                .await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.get_session("missing").await, Ok(None)));
    }

    #[tokio::test]
    async fn test_illegal_transition_is_rejected() {
        let store = InMemorySessionStore::new();
        let session = store
            .create_session(&Query::new("Q?", "u"), SessionMode::Multi)
            .await
            .unwrap();
        let err = store
            .update_session(&session.id, SessionUpdate::status(SessionStatus::Completed))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));

        let stored = store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Pending);
    }
}
