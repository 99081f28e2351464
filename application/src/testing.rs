//! Scripted test doubles shared by the use case tests.

use crate::ports::responder::{Responder, ResponderError};
use crate::ports::session_store::{SessionStore, StoreError};
use async_trait::async_trait;
use deliberation_domain::{
    Generation, GenerationContext, Query, ResponderInfo, Session, SessionMode, SessionStatus,
    SessionUpdate,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Handler = dyn Fn(&str, usize) -> Result<String, ResponderError> + Send + Sync;

/// Responder whose replies come from a closure over (prompt, call number).
pub struct MockResponder {
    info: ResponderInfo,
    handler: Box<Handler>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    contexts: Mutex<Vec<Option<GenerationContext>>>,
}

impl MockResponder {
    pub fn with_handler(
        id: &str,
        handler: impl Fn(&str, usize) -> Result<String, ResponderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            info: ResponderInfo::new(id, id, "mock"),
            handler: Box::new(handler),
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Always replies with `text`
    pub fn answering(id: &str, text: &str) -> Self {
        let text = text.to_string();
        Self::with_handler(id, move |_, _| Ok(text.clone()))
    }

    /// Always fails with `error`
    pub fn failing(id: &str, error: ResponderError) -> Self {
        Self::with_handler(id, move |_, _| Err(error.clone()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Context passed with each call, in call order
    pub fn contexts(&self) -> Vec<Option<GenerationContext>> {
        self.contexts.lock().unwrap().clone()
    }

    pub fn arc(self) -> Arc<dyn Responder> {
        Arc::new(self)
    }
}

#[async_trait]
impl Responder for MockResponder {
    fn info(&self) -> &ResponderInfo {
        &self.info
    }

    async fn generate(
        &self,
        prompt: &str,
        context: Option<&GenerationContext>,
    ) -> Result<Generation, ResponderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.contexts.lock().unwrap().push(context.cloned());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(prompt, call).map(|text| Generation::new(text, 1))
    }
}

/// What kind of prompt a responder is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Initial,
    Debate,
    Proposal,
    Acceptance,
}

pub fn prompt_kind(prompt: &str) -> PromptKind {
    if prompt.contains("This is debate round") {
        PromptKind::Debate
    } else if prompt.contains("Incorporated insights:") {
        PromptKind::Proposal
    } else if prompt.contains("Do you accept this solution") {
        PromptKind::Acceptance
    } else {
        PromptKind::Initial
    }
}

/// In-memory store that also records every status it was moved to.
#[derive(Default)]
pub struct RecordingStore {
    sessions: Mutex<HashMap<String, Session>>,
    statuses: Mutex<Vec<SessionStatus>>,
}

impl RecordingStore {
    pub fn statuses(&self) -> Vec<SessionStatus> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.sessions.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn create_session(&self, query: &Query, mode: SessionMode) -> Result<Session, StoreError> {
        let session = Session::new(query.clone(), mode);
        self.statuses.lock().unwrap().push(session.status);
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn update_session(&self, id: &str, update: SessionUpdate) -> Result<Session, StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let status = update.status;
        session.apply(update)?;
        if let Some(status) = status {
            self.statuses.lock().unwrap().push(status);
        }
        Ok(session.clone())
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }
}
