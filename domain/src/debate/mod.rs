//! Debate domain
//!
//! Value types for multi-round debate plus the pure pieces of the round
//! state machine: configuration bounds, disagreement measurement and the
//! early-termination rule. Running rounds against responders is an
//! application concern.

pub mod config;
pub mod disagreement;
pub mod round;

pub use config::{DebateConfig, MAX_DEBATE_ROUNDS};
pub use disagreement::{disagreement_level, should_terminate};
pub use round::{DebateResult, DebateRound, Exchange};
