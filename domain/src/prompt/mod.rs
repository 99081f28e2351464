//! Prompt domain
//!
//! Templates for each stage of a deliberation.

mod template;

pub use template::PromptTemplate;
