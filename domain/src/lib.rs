//! Domain layer for quorum-deliberation
//!
//! This crate contains the core deliberation model and its algorithms.
//! It has no dependencies on infrastructure, presentation or an async
//! runtime.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! A query is answered by several independent responders, then refined
//! through four phases:
//!
//! - **Collection**: every responder answers blind to its peers
//! - **Analysis**: themes, methodologies and differences across answers
//! - **Debate**: rounds of critique, defense and revision until the
//!   positions converge or the round limit is reached
//! - **Consensus**: final proposals are clustered; a majority wins,
//!   otherwise a hybrid is synthesized and put to a vote
//!
//! ## Direct
//!
//! A single responder answers the query without the pipeline.

pub mod analysis;
pub mod config;
pub mod consensus;
pub mod core;
pub mod debate;
pub mod orchestration;
pub mod parsing;
pub mod prompt;
pub mod resilience;
pub mod text;
pub mod util;

// Re-export commonly used types
pub use analysis::{
    AnalysisConfig, AnalysisEngine, AnalysisReport, CommonTheme, Difference, DifferenceKind,
    Methodology, UniqueApproach,
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    ClusterDecision, ConsensusConfig, ConsensusMethod, ConsensusResult, Insight, Proposal,
    Solution, Vote, VoteResult,
};
pub use core::{error::DomainError, query::Query, responder::ResponderInfo};
pub use debate::{DebateConfig, DebateResult, DebateRound, Exchange, MAX_DEBATE_ROUNDS};
pub use orchestration::{
    entities::{Phase, Session, SessionMode, SessionStatus, SessionUpdate},
    value_objects::{Generation, GenerationContext, ResponderFailure, ResponderOutput},
};
pub use parsing::{
    DebateReply, ProposalReply, parse_acceptance_response, parse_debate_response,
    parse_proposal_response,
};
pub use prompt::PromptTemplate;
pub use resilience::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, ResilienceConfig, RetryPolicy,
};
