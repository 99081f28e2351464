//! Application-level configuration.
//!
//! - [`DeliberationParams`] - phase time bounds, responder limits and the
//!   tuned heuristics of every phase

pub mod deliberation_params;

pub use deliberation_params::DeliberationParams;
