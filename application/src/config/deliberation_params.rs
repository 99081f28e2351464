//! Deliberation parameters - phase bounds and heuristics.
//!
//! [`DeliberationParams`] groups everything the use cases need to run a
//! deliberation: the domain configs of each phase, the resilience policy
//! around remote calls, and the time bounds on each phase.

use deliberation_domain::{
    AnalysisConfig, ConsensusConfig, DebateConfig, DomainError, ResilienceConfig,
};
use serde::Serialize;
use std::time::Duration;

/// Session bound for small panels
const SMALL_PANEL_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// Session bound above [`SMALL_PANEL_SIZE`] responders
const LARGE_PANEL_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const SMALL_PANEL_SIZE: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DeliberationParams {
    pub analysis: AnalysisConfig,
    pub debate: DebateConfig,
    pub consensus: ConsensusConfig,
    pub resilience: ResilienceConfig,
    /// Bound on each collection call
    pub collection_timeout: Duration,
    /// Bound on the whole analysis phase
    pub analysis_timeout: Duration,
    /// Bound on the whole consensus phase
    pub consensus_timeout: Duration,
    /// Bound on each debate, proposal and vote call
    pub call_timeout: Duration,
    /// Overrides the size-dependent session bound
    pub session_timeout: Option<Duration>,
    pub min_responders: usize,
    pub max_responders: usize,
    /// Successful collections needed to continue
    pub min_successful_responses: usize,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            debate: DebateConfig::default(),
            consensus: ConsensusConfig::default(),
            resilience: ResilienceConfig::default(),
            collection_timeout: Duration::from_secs(30),
            analysis_timeout: Duration::from_secs(10),
            consensus_timeout: Duration::from_secs(60),
            call_timeout: Duration::from_secs(30),
            session_timeout: None,
            min_responders: 2,
            max_responders: 10,
            min_successful_responses: 2,
        }
    }
}

impl DeliberationParams {
    /// Overall bound for a deliberation with `responders` participants.
    pub fn session_timeout_for(&self, responders: usize) -> Duration {
        self.session_timeout.unwrap_or(if responders <= SMALL_PANEL_SIZE {
            SMALL_PANEL_TIMEOUT
        } else {
            LARGE_PANEL_TIMEOUT
        })
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.analysis.validate()?;
        self.debate.validate()?;
        self.consensus.validate()?;
        self.resilience.validate()?;
        if self.min_responders < 2 {
            return Err(DomainError::config(
                "deliberation.min_responders",
                "a deliberation needs at least 2 responders",
            ));
        }
        if self.max_responders < self.min_responders {
            return Err(DomainError::config(
                "deliberation.max_responders",
                "must not be below min_responders",
            ));
        }
        if self.min_successful_responses < 2 {
            return Err(DomainError::config(
                "deliberation.min_successful_responses",
                "must be at least 2",
            ));
        }
        Ok(())
    }

    // ==================== Builder Methods ====================

    pub fn with_debate(mut self, debate: DebateConfig) -> Self {
        self.debate = debate;
        self
    }

    pub fn with_consensus(mut self, consensus: ConsensusConfig) -> Self {
        self.consensus = consensus;
        self
    }

    pub fn with_resilience(mut self, resilience: ResilienceConfig) -> Self {
        self.resilience = resilience;
        self
    }

    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    pub fn with_consensus_timeout(mut self, timeout: Duration) -> Self {
        self.consensus_timeout = timeout;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.collection_timeout = timeout;
        self.call_timeout = timeout;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = Some(timeout);
        self
    }
}
