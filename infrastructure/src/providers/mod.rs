//! Responder providers
//!
//! Adapters implementing the [`Responder`](deliberation_application::Responder)
//! port, and the registry that builds them from `[[responders]]` entries.

pub mod command;
#[cfg(feature = "openai")]
pub mod openai;
pub mod registry;

use deliberation_domain::{GenerationContext, PromptTemplate};
use std::fmt;
use std::str::FromStr;

/// Kind of backend a responder entry talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenAI-compatible `/chat/completions` endpoint
    OpenAi,
    /// Local program reading the prompt on stdin
    Command,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Command];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Command => "command",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "openai-compatible" => Ok(ProviderKind::OpenAi),
            "command" | "cmd" => Ok(ProviderKind::Command),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Single prompt string for backends without structured context.
///
/// Rendered context comes first so the instruction stays at the end.
pub(crate) fn prompt_with_context(prompt: &str, context: Option<&GenerationContext>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => {
            format!("{}\n\n{}", PromptTemplate::render_context(ctx).trim_end(), prompt)
        }
        _ => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberation_domain::ResponderOutput;

    #[test]
    fn test_prompt_with_context() {
        assert_eq!(prompt_with_context("Q?", None), "Q?");
        assert_eq!(
            prompt_with_context("Q?", Some(&GenerationContext::default())),
            "Q?"
        );

        let ctx = GenerationContext {
            peer_responses: vec![ResponderOutput::new("peer", "use a cache")],
            ..Default::default()
        };
        let prompt = prompt_with_context("Q?", Some(&ctx));
        assert!(prompt.contains("use a cache"));
        assert!(prompt.ends_with("Q?"));
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("openai".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!("OpenAI-Compatible".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!("cmd".parse::<ProviderKind>(), Ok(ProviderKind::Command));
        assert!("bedrock".parse::<ProviderKind>().is_err());
    }
}
