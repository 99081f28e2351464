//! Application layer for quorum-deliberation
//!
//! This crate contains use cases, port definitions, the resilience
//! wrapper around responder calls, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod resilience;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::DeliberationParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, PhaseUpdate, ProgressNotifier},
    responder::{Responder, ResponderError},
    session_store::{SessionStore, StoreError},
};
pub use resilience::{CircuitBreakerRegistry, ResilientCaller};
pub use use_cases::analyze_responses::AnalyzeResponsesUseCase;
pub use use_cases::build_consensus::{BuildConsensusUseCase, ConsensusOutcome};
pub use use_cases::collect_responses::{CollectResponsesUseCase, CollectionOutcome};
pub use use_cases::error::DeliberationError;
pub use use_cases::run_debate::{DebateInput, DebateOutcome, RunDebateUseCase};
pub use use_cases::run_deliberation::{
    DeliberationInput, DeliberationOutput, RunDeliberationUseCase,
};
pub use use_cases::run_direct::RunDirectUseCase;
