//! Infrastructure layer for quorum-deliberation
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: responder providers, session storage,
//! the JSONL transcript, and configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileDeliberationConfig, FileOutputConfig, FileResponderConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    ProviderKind,
    command::CommandResponder,
    registry::{RegistryError, ResponderRegistry},
};
#[cfg(feature = "openai")]
pub use providers::openai::OpenAiCompatibleResponder;
pub use store::InMemorySessionStore;
