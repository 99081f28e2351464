//! Responder registry
//!
//! Builds [`Responder`] adapters from `[[responders]]` entries and
//! resolves a query's explicit responder selection against them.

use super::ProviderKind;
use super::command::CommandResponder;
use crate::config::FileResponderConfig;
use deliberation_application::Responder;
use deliberation_domain::ResponderInfo;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("Responder '{id}': unknown provider '{provider}'")]
    UnknownProvider { id: String, provider: String },

    #[error("Responder '{id}': provider requires '{setting}'")]
    MissingSetting { id: String, setting: &'static str },

    #[error("Responder '{id}': built without the '{feature}' feature")]
    FeatureDisabled { id: String, feature: &'static str },

    #[error("Duplicate responder id: {0}")]
    DuplicateId(String),

    #[error("Unknown responder: {0} (available: {1})")]
    UnknownResponder(String, String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Registry of enabled responders, in configuration order
#[derive(Default)]
pub struct ResponderRegistry {
    responders: Vec<Arc<dyn Responder>>,
}

impl ResponderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build adapters for every enabled entry. Disabled entries are skipped.
    pub fn from_config(entries: &[FileResponderConfig]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        #[cfg(feature = "openai")]
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RegistryError::Client(e.to_string()))?;

        for entry in entries {
            if !entry.enabled {
                debug!("Skipping disabled responder {}", entry.id);
                continue;
            }
            let info = ResponderInfo::new(&entry.id, entry.display_name(), &entry.provider);
            let kind = ProviderKind::from_str(&entry.provider).map_err(|_| {
                RegistryError::UnknownProvider {
                    id: entry.id.clone(),
                    provider: entry.provider.clone(),
                }
            })?;

            let responder: Arc<dyn Responder> = match kind {
                ProviderKind::Command => {
                    let program =
                        entry
                            .command
                            .as_deref()
                            .ok_or_else(|| RegistryError::MissingSetting {
                                id: entry.id.clone(),
                                setting: "command",
                            })?;
                    Arc::new(CommandResponder::new(info, program, entry.args.clone()))
                }
                #[cfg(feature = "openai")]
                ProviderKind::OpenAi => {
                    use super::openai::{
                        DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, OpenAiCompatibleResponder,
                    };

                    let model =
                        entry
                            .model
                            .as_deref()
                            .ok_or_else(|| RegistryError::MissingSetting {
                                id: entry.id.clone(),
                                setting: "model",
                            })?;
                    let key_env = entry.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
                    Arc::new(
                        OpenAiCompatibleResponder::new(info, client.clone(), model)
                            .with_base_url(entry.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
                            .with_api_key(std::env::var(key_env).ok())
                            .with_max_tokens(entry.max_tokens)
                            .with_temperature(entry.temperature),
                    )
                }
                #[cfg(not(feature = "openai"))]
                ProviderKind::OpenAi => {
                    return Err(RegistryError::FeatureDisabled {
                        id: entry.id.clone(),
                        feature: "openai",
                    });
                }
            };
            registry.register(responder)?;
        }

        info!("Registered {} responders", registry.len());
        Ok(registry)
    }

    pub fn register(&mut self, responder: Arc<dyn Responder>) -> Result<(), RegistryError> {
        if self.get(responder.id()).is_some() {
            return Err(RegistryError::DuplicateId(responder.id().to_string()));
        }
        self.responders.push(responder);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Responder>> {
        self.responders.iter().find(|r| r.id() == id).cloned()
    }

    pub fn all(&self) -> &[Arc<dyn Responder>] {
        &self.responders
    }

    pub fn ids(&self) -> Vec<&str> {
        self.responders.iter().map(|r| r.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }

    /// Resolve an explicit selection, or every responder when `ids` is `None`.
    ///
    /// Selection order is preserved; repeated ids are taken once.
    pub fn select(&self, ids: Option<&[String]>) -> Result<Vec<Arc<dyn Responder>>, RegistryError> {
        let Some(ids) = ids else {
            return Ok(self.responders.clone());
        };

        let mut selected: Vec<Arc<dyn Responder>> = Vec::with_capacity(ids.len());
        for id in ids {
            if selected.iter().any(|r| r.id() == id) {
                continue;
            }
            let responder = self.get(id).ok_or_else(|| {
                RegistryError::UnknownResponder(id.clone(), self.ids().join(", "))
            })?;
            selected.push(responder);
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_entry(id: &str) -> FileResponderConfig {
        FileResponderConfig {
            id: id.to_string(),
            provider: "command".to_string(),
            command: Some("cat".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_config_skips_disabled() {
        let mut disabled = command_entry("c");
        disabled.enabled = false;
        let registry =
            ResponderRegistry::from_config(&[command_entry("a"), command_entry("b"), disabled])
                .unwrap();

        assert_eq!(registry.ids(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().info().provider, "command");
        assert!(registry.get("c").is_none());
    }

    #[test]
    fn test_from_config_errors() {
        let mut unknown = command_entry("x");
        unknown.provider = "smoke-signals".to_string();
        assert!(matches!(
            ResponderRegistry::from_config(&[unknown]),
            Err(RegistryError::UnknownProvider { .. })
        ));

        let mut missing = command_entry("y");
        missing.command = None;
        assert_eq!(
            ResponderRegistry::from_config(&[missing]).err(),
            Some(RegistryError::MissingSetting {
                id: "y".to_string(),
                setting: "command"
            })
        );

        assert_eq!(
            ResponderRegistry::from_config(&[command_entry("a"), command_entry("a")]).err(),
            Some(RegistryError::DuplicateId("a".to_string()))
        );
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_from_config_openai() {
        let entry = FileResponderConfig {
            id: "gpt".to_string(),
            name: Some("GPT".to_string()),
            provider: "openai".to_string(),
            model: Some("gpt-4o-mini".to_string()),
            ..Default::default()
        };
        let registry = ResponderRegistry::from_config(&[entry]).unwrap();
        assert_eq!(registry.get("gpt").unwrap().info().name, "GPT");
    }

    #[test]
    fn test_select() {
        let registry =
            ResponderRegistry::from_config(&[command_entry("a"), command_entry("b"), command_entry("c")])
                .unwrap();

        assert_eq!(registry.select(None).unwrap().len(), 3);

        let ids = vec!["c".to_string(), "a".to_string(), "c".to_string()];
        let selected = registry.select(Some(&ids)).unwrap();
        let selected: Vec<&str> = selected.iter().map(|r| r.id()).collect();
        assert_eq!(selected, vec!["c", "a"]);

        let ids = vec!["zzz".to_string()];
        match registry.select(Some(&ids)) {
            Err(RegistryError::UnknownResponder(id, available)) => {
                assert_eq!(id, "zzz");
                assert_eq!(available, "a, b, c");
            }
            _ => panic!("expected unknown responder"),
        }
    }
}
