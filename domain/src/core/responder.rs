//! Responder identity

use serde::{Deserialize, Serialize};

/// Identity and metadata of a participating responder (Value Object)
///
/// The generation capability itself is an application-layer port; the
/// domain only needs to know who a responder is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponderInfo {
    /// Stable identifier, unique within a registry
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Provider tag (e.g. "openai", "command")
    pub provider: String,
    pub enabled: bool,
}

impl ResponderInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider: provider.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl std::fmt::Display for ResponderInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name == self.id {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.name, self.id)
        }
    }
}
