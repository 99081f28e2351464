//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`] - an immutable question posed to the responders
//! - [`responder::ResponderInfo`] - identity and metadata of one responder
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod query;
pub mod responder;
pub mod string;
