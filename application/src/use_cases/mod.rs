//! Use cases
//!
//! Application-level operations that orchestrate domain logic. One use
//! case per deliberation phase, plus the two entry points:
//! [`run_deliberation`] for the full pipeline and [`run_direct`] for a
//! single responder.

pub mod analyze_responses;
pub mod build_consensus;
pub mod collect_responses;
pub mod error;
pub mod run_debate;
pub mod run_deliberation;
pub mod run_direct;
pub(crate) mod shared;
