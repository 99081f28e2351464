//! Orchestration domain entities

use crate::analysis::report::AnalysisReport;
use crate::consensus::solution::ConsensusResult;
use crate::core::error::DomainError;
use crate::core::query::Query;
use crate::debate::round::DebateResult;
use crate::orchestration::value_objects::{ResponderFailure, ResponderOutput};
use crate::util::now_millis;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phase of a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// All responders answer the query independently
    Collection,
    /// Themes, approaches and differences are extracted
    Analysis,
    /// Responders critique each other over several rounds
    Debate,
    /// Final proposals are clustered into a single solution
    Consensus,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Collection => "collection",
            Phase::Analysis => "analysis",
            Phase::Debate => "debate",
            Phase::Consensus => "consensus",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Collection => "Response Collection",
            Phase::Analysis => "Analysis",
            Phase::Debate => "Debate",
            Phase::Consensus => "Consensus",
        }
    }

    /// Session status while this phase runs
    pub fn status(&self) -> SessionStatus {
        match self {
            Phase::Collection => SessionStatus::Collecting,
            Phase::Analysis => SessionStatus::Analyzing,
            Phase::Debate => SessionStatus::Debating,
            Phase::Consensus => SessionStatus::Consensus,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Single responder or full multi-phase deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Single,
    Multi,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionMode::Single => write!(f, "single"),
            SessionMode::Multi => write!(f, "multi"),
        }
    }
}

/// Session lifecycle
///
/// ```text
/// Pending → Collecting → Analyzing → Debating → Consensus → Completed
///    └──────────┴────────────┴───────────┴──────────┴──────→ Failed
/// ```
///
/// Single-responder sessions go straight from `Collecting` to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Collecting,
    Analyzing,
    Debating,
    Consensus,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }

    /// Whether `next` is a legal successor of this status
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        match (self, next) {
            (s, Failed) => !s.is_terminal(),
            (Pending, Collecting)
            | (Collecting, Analyzing)
            | (Collecting, Completed)
            | (Analyzing, Debating)
            | (Debating, Consensus)
            | (Consensus, Completed) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Collecting => "collecting",
            SessionStatus::Analyzing => "analyzing",
            SessionStatus::Debating => "debating",
            SessionStatus::Consensus => "consensus",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate root of one deliberation (Entity)
///
/// Owned by the session store. The pipeline only ever sends
/// [`SessionUpdate`]s for the fields of the phase it is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub query: Query,
    pub mode: SessionMode,
    pub status: SessionStatus,
    #[serde(default)]
    pub responses: Vec<ResponderOutput>,
    #[serde(default)]
    pub failures: Vec<ResponderFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debate: Option<DebateResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ConsensusResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
}

impl Session {
    /// Create a pending session for a query
    pub fn new(query: Query, mode: SessionMode) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: query.user_id().to_string(),
            query,
            mode,
            status: SessionStatus::Pending,
            responses: Vec::new(),
            failures: Vec::new(),
            analysis: None,
            debate: None,
            consensus: None,
            result_text: None,
            error: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Apply a partial update, stamping `updated_at` (and `completed_at`
    /// when the new status is terminal).
    ///
    /// A status change must be a legal successor of the current status;
    /// otherwise nothing is applied. Failures are appended, never replaced.
    pub fn apply(&mut self, update: SessionUpdate) -> Result<(), DomainError> {
        if let Some(next) = update.status {
            if next != self.status && !self.status.can_transition_to(next) {
                return Err(DomainError::InvalidTransition {
                    from: self.status,
                    to: next,
                });
            }
        }

        let now = now_millis();
        if let Some(status) = update.status {
            self.status = status;
            if status.is_terminal() {
                self.completed_at = Some(now);
            }
        }
        if let Some(responses) = update.responses {
            self.responses = responses;
        }
        self.failures.extend(update.failures);
        if let Some(analysis) = update.analysis {
            self.analysis = Some(analysis);
        }
        if let Some(debate) = update.debate {
            self.debate = Some(debate);
        }
        if let Some(consensus) = update.consensus {
            self.consensus = Some(consensus);
        }
        if let Some(text) = update.result_text {
            self.result_text = Some(text);
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Partial set of session fields written by one phase
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub status: Option<SessionStatus>,
    pub responses: Option<Vec<ResponderOutput>>,
    /// Appended to the failures already on the session
    pub failures: Vec<ResponderFailure>,
    pub analysis: Option<AnalysisReport>,
    pub debate: Option<DebateResult>,
    pub consensus: Option<ConsensusResult>,
    pub result_text: Option<String>,
    pub error: Option<String>,
}

impl SessionUpdate {
    pub fn status(status: SessionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Mark the session failed with a human-readable reason
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(SessionStatus::Failed),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_responses(mut self, responses: Vec<ResponderOutput>) -> Self {
        self.responses = Some(responses);
        self
    }

    pub fn with_failures(mut self, failures: Vec<ResponderFailure>) -> Self {
        self.failures.extend(failures);
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisReport) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_debate(mut self, debate: DebateResult) -> Self {
        self.debate = Some(debate);
        self
    }

    pub fn with_consensus(mut self, consensus: ConsensusResult) -> Self {
        self.consensus = Some(consensus);
        self
    }

    pub fn with_result_text(mut self, text: impl Into<String>) -> Self {
        self.result_text = Some(text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_status_mapping() {
        assert_eq!(Phase::Collection.status(), SessionStatus::Collecting);
        assert_eq!(Phase::Consensus.status(), SessionStatus::Consensus);
        assert_eq!(Phase::Debate.as_str(), "debate");
    }

    #[test]
    fn test_status_happy_path_transitions() {
        use SessionStatus::*;
        let path = [Pending, Collecting, Analyzing, Debating, Consensus, Completed];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn test_status_illegal_transitions() {
        use SessionStatus::*;
        assert!(!Pending.can_transition_to(Debating));
        assert!(!Analyzing.can_transition_to(Collecting));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Collecting));
    }

    #[test]
    fn test_any_live_status_can_fail() {
        use SessionStatus::*;
        for s in [Pending, Collecting, Analyzing, Debating, Consensus] {
            assert!(s.can_transition_to(Failed));
        }
    }

    #[test]
    fn test_session_apply_update() {
        let mut session = Session::new(Query::new("Q?", "u"), SessionMode::Multi);
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.user_id, "u");

        session
            .apply(SessionUpdate::status(SessionStatus::Collecting))
            .unwrap();
        session
            .apply(
                SessionUpdate::status(SessionStatus::Analyzing)
                    .with_responses(vec![ResponderOutput::new("a", "x")]),
            )
            .unwrap();
        assert_eq!(session.status, SessionStatus::Analyzing);
        assert_eq!(session.responses.len(), 1);
        assert!(session.completed_at.is_none());

        session.apply(SessionUpdate::failed("boom")).unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
        assert_eq!(session.error.as_deref(), Some("boom"));
        assert!(session.completed_at.is_some());
        // untouched fields survive
        assert_eq!(session.responses.len(), 1);
    }

    #[test]
    fn test_illegal_transition_leaves_session_untouched() {
        let mut session = Session::new(Query::new("Q?", "u"), SessionMode::Multi);
        let err = session
            .apply(
                SessionUpdate::status(SessionStatus::Debating)
                    .with_responses(vec![ResponderOutput::new("a", "x")]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: SessionStatus::Pending,
                to: SessionStatus::Debating,
            }
        );
        assert_eq!(session.status, SessionStatus::Pending);
        assert!(session.responses.is_empty());

        session.apply(SessionUpdate::failed("boom")).unwrap();
        assert!(session.apply(SessionUpdate::failed("again")).is_ok());
        assert!(
            session
                .apply(SessionUpdate::status(SessionStatus::Collecting))
                .is_err()
        );
    }

    #[test]
    fn test_failures_accumulate_across_updates() {
        let mut session = Session::new(Query::new("Q?", "u"), SessionMode::Multi);
        session
            .apply(
                SessionUpdate::status(SessionStatus::Collecting)
                    .with_failures(vec![ResponderFailure::new("c", "down")]),
            )
            .unwrap();
        session
            .apply(
                SessionUpdate::failed("stalled")
                    .with_failures(vec![ResponderFailure::new("a", "x")])
                    .with_failures(vec![ResponderFailure::new("b", "y")]),
            )
            .unwrap();
        let ids: Vec<&str> = session
            .failures
            .iter()
            .map(|f| f.responder_id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_session_serializes_status_snake_case() {
        let session = Session::new(Query::new("Q?", "u"), SessionMode::Single);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["mode"], "single");
    }
}
