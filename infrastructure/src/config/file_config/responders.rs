//! Responder configuration from TOML (`[[responders]]` entries)
//!
//! Example configuration:
//!
//! ```toml
//! [[responders]]
//! id = "gpt"
//! provider = "openai"
//! model = "gpt-4o-mini"
//!
//! [[responders]]
//! id = "local"
//! provider = "command"
//! command = "ollama"
//! args = ["run", "llama3"]
//! ```

use serde::{Deserialize, Serialize};

/// One `[[responders]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResponderConfig {
    /// Unique responder id (used for `--responder` selection)
    pub id: String,
    /// Display name (defaults to the id)
    pub name: Option<String>,
    /// Provider kind: "openai" or "command"
    pub provider: String,
    pub enabled: bool,

    // ---- openai ----
    /// Model name sent to the chat completions endpoint
    pub model: Option<String>,
    /// Base URL (default: "https://api.openai.com/v1")
    pub base_url: Option<String>,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY")
    pub api_key_env: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,

    // ---- command ----
    /// Program to run; the prompt is written to its stdin
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl Default for FileResponderConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: None,
            provider: String::new(),
            enabled: true,
            model: None,
            base_url: None,
            api_key_env: None,
            max_tokens: None,
            temperature: None,
            command: None,
            args: Vec::new(),
        }
    }
}

impl FileResponderConfig {
    /// Display name, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
