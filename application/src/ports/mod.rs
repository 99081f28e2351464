//! Ports (interfaces) for the application layer
//!
//! These traits define the boundaries between the application layer
//! and the outside world. Implementations (adapters) live in the
//! infrastructure and presentation layers.

pub mod conversation_logger;
pub mod progress;
pub mod responder;
pub mod session_store;
