//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Tuning sections deserialize straight into the domain config types.

mod deliberation;
mod output;
mod responders;

pub use deliberation::FileDeliberationConfig;
pub use output::FileOutputConfig;
pub use responders::FileResponderConfig;

use crate::providers::ProviderKind;
use deliberation_application::DeliberationParams;
use deliberation_domain::{
    AnalysisConfig, ConfigIssue, ConfigIssueCode, ConsensusConfig, DebateConfig, DomainError,
    MAX_DEBATE_ROUNDS, ResilienceConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Participating responders
    pub responders: Vec<FileResponderConfig>,
    /// Phase timeouts and responder limits
    pub deliberation: FileDeliberationConfig,
    pub analysis: AnalysisConfig,
    pub debate: DebateConfig,
    pub consensus: ConsensusConfig,
    /// Retry, circuit breaker and wrapper timeout
    pub resilience: ResilienceConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Responder entries (presence, unique ids, provider kinds, settings)
    /// 2. Round limits
    /// 3. Thresholds and bounds of every tuning section
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.validate_responders();

        // Round limits get their own codes; the rest of the debate
        // section is checked only when those are sound.
        let debate = &self.debate;
        if debate.min_rounds > debate.max_rounds {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidRoundLimits,
                format!(
                    "debate.min_rounds ({}) exceeds debate.max_rounds ({})",
                    debate.min_rounds, debate.max_rounds
                ),
            ));
        } else if debate.max_rounds > MAX_DEBATE_ROUNDS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                format!(
                    "debate.max_rounds: {} exceeds the limit of {}",
                    debate.max_rounds, MAX_DEBATE_ROUNDS
                ),
            ));
        } else if let Err(e) = debate.validate() {
            issues.push(out_of_range(e));
        }

        for result in [
            self.analysis.validate(),
            self.consensus.validate(),
            self.resilience.validate(),
        ] {
            if let Err(e) = result {
                issues.push(out_of_range(e));
            }
        }

        let d = &self.deliberation;
        if d.min_responders < 2 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                "deliberation.min_responders: must be at least 2",
            ));
        } else if d.max_responders < d.min_responders {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                "deliberation.max_responders: must not be below min_responders",
            ));
        }
        if d.min_successful_responses < 2 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange,
                "deliberation.min_successful_responses: must be at least 2",
            ));
        }
        for (field, secs) in [
            ("deliberation.collection_timeout_secs", d.collection_timeout_secs),
            ("deliberation.analysis_timeout_secs", d.analysis_timeout_secs),
            ("deliberation.consensus_timeout_secs", d.consensus_timeout_secs),
            ("deliberation.call_timeout_secs", d.call_timeout_secs),
        ] {
            if secs == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange,
                    format!("{}: cannot be 0", field),
                ));
            }
        }

        let enabled = self.enabled_responders().count();
        if enabled > d.max_responders {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::TooManyResponders,
                format!(
                    "{} responders enabled but a deliberation accepts at most {}; select some with --responder",
                    enabled, d.max_responders
                ),
            ));
        }

        issues
    }

    fn validate_responders(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for responder in &self.responders {
            if responder.id.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingProviderSetting,
                    "responders: entry without an id",
                ));
                continue;
            }
            if !seen.insert(responder.id.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateResponderId,
                    format!("responders: duplicate id '{}'", responder.id),
                ));
            }

            let missing = match ProviderKind::from_str(&responder.provider) {
                Ok(ProviderKind::OpenAi) => responder.model.is_none().then_some("model"),
                Ok(ProviderKind::Command) => responder.command.is_none().then_some("command"),
                Err(_) => {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::UnknownProvider,
                        format!(
                            "responders.{}: unknown provider '{}' (expected one of: {})",
                            responder.id,
                            responder.provider,
                            ProviderKind::ALL
                                .iter()
                                .map(|k| k.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    ));
                    None
                }
            };
            if let Some(setting) = missing {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingProviderSetting,
                    format!(
                        "responders.{}: provider '{}' requires '{}'",
                        responder.id, responder.provider, setting
                    ),
                ));
            }
        }

        match self.enabled_responders().count() {
            0 => issues.push(ConfigIssue::error(
                ConfigIssueCode::NoResponders,
                "no enabled responders; add a [[responders]] entry",
            )),
            1 => issues.push(ConfigIssue::warning(
                ConfigIssueCode::SingleResponder,
                "only one responder is enabled; queries will use the direct path",
            )),
            _ => {}
        }

        issues
    }

    /// Responder entries that take part in deliberations
    pub fn enabled_responders(&self) -> impl Iterator<Item = &FileResponderConfig> {
        self.responders.iter().filter(|r| r.enabled)
    }

    /// Convert to the runtime parameters used by the application layer
    pub fn to_params(&self) -> DeliberationParams {
        let d = &self.deliberation;
        let mut params = DeliberationParams {
            analysis: self.analysis.clone(),
            debate: self.debate.clone(),
            consensus: self.consensus.clone(),
            resilience: self.resilience.clone(),
            collection_timeout: Duration::from_secs(d.collection_timeout_secs),
            analysis_timeout: Duration::from_secs(d.analysis_timeout_secs),
            consensus_timeout: Duration::from_secs(d.consensus_timeout_secs),
            call_timeout: Duration::from_secs(d.call_timeout_secs),
            session_timeout: None,
            min_responders: d.min_responders,
            max_responders: d.max_responders,
            min_successful_responses: d.min_successful_responses,
        };
        if let Some(secs) = d.session_timeout_secs {
            params = params.with_session_timeout(Duration::from_secs(secs));
        }
        params
    }
}

fn out_of_range(error: DomainError) -> ConfigIssue {
    let message = match error {
        DomainError::InvalidConfig { field, reason } => format!("{}: {}", field, reason),
        other => other.to_string(),
    };
    ConfigIssue::error(ConfigIssueCode::OutOfRange, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberation_domain::Severity;

    fn two_responders() -> &'static str {
        r#"
[[responders]]
id = "a"
provider = "command"
command = "cat"

[[responders]]
id = "b"
provider = "openai"
model = "gpt-4o-mini"
"#
    }

    fn codes(config: &FileConfig) -> Vec<ConfigIssueCode> {
        config.validate().into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[[responders]]
id = "a"
provider = "command"
command = "cat"

[deliberation]
user_id = "alice"
consensus_timeout_secs = 90
session_timeout_secs = 120

[debate]
max_rounds = 3
convergence_threshold = 0.1

[consensus]
similarity_threshold = 0.7

[resilience.retry]
max_attempts = 5

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.deliberation.user_id, "alice");
        assert_eq!(config.debate.max_rounds, 3);
        // Unset fields keep their defaults
        assert_eq!(config.debate.min_rounds, 1);
        assert_eq!(config.analysis, AnalysisConfig::default());
        assert_eq!(config.resilience.retry.max_attempts, 5);
        assert_eq!(config.resilience.circuit_breaker.failure_threshold, 5);
        assert!(!config.output.color);

        let params = config.to_params();
        assert_eq!(params.consensus_timeout, Duration::from_secs(90));
        assert_eq!(params.session_timeout_for(2), Duration::from_secs(120));
        assert!((params.consensus.similarity_threshold - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.responders.is_empty());
        assert!(config.output.color);
        assert_eq!(config.deliberation.max_responders, 10);

        let params = config.to_params();
        assert_eq!(params.collection_timeout, Duration::from_secs(30));
        assert_eq!(params.session_timeout_for(6), Duration::from_secs(600));
    }

    #[test]
    fn test_validate_valid_config() {
        let config: FileConfig = toml::from_str(two_responders()).unwrap();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_no_responders() {
        let issues = FileConfig::default().validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::NoResponders);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_validate_single_responder_is_warning() {
        let mut config: FileConfig = toml::from_str(two_responders()).unwrap();
        config.responders[1].enabled = false;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::SingleResponder);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_validate_responder_problems() {
        let toml_str = r#"
[[responders]]
id = "a"
provider = "command"

[[responders]]
id = "a"
provider = "carrier-pigeon"

[[responders]]
id = "c"
provider = "openai"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let codes = codes(&config);
        assert!(codes.contains(&ConfigIssueCode::DuplicateResponderId));
        assert!(codes.contains(&ConfigIssueCode::UnknownProvider));
        assert_eq!(
            codes
                .iter()
                .filter(|c| **c == ConfigIssueCode::MissingProviderSetting)
                .count(),
            2
        );
    }

    #[test]
    fn test_validate_round_limits() {
        let mut config: FileConfig = toml::from_str(two_responders()).unwrap();
        config.debate.min_rounds = 4;
        config.debate.max_rounds = 2;
        assert_eq!(codes(&config), vec![ConfigIssueCode::InvalidRoundLimits]);

        config.debate.min_rounds = 1;
        config.debate.max_rounds = 8;
        assert_eq!(codes(&config), vec![ConfigIssueCode::OutOfRange]);
    }

    #[test]
    fn test_validate_thresholds() {
        let mut config: FileConfig = toml::from_str(two_responders()).unwrap();
        config.consensus.majority_threshold = 1.5;
        config.deliberation.call_timeout_secs = 0;
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == ConfigIssueCode::OutOfRange));
        assert!(issues[0].message.contains("consensus.majority_threshold"));
    }

    #[test]
    fn test_validate_too_many_responders() {
        let mut config: FileConfig = toml::from_str(two_responders()).unwrap();
        config.deliberation.min_responders = 2;
        config.deliberation.max_responders = 2;
        config.responders.push(FileResponderConfig {
            id: "c".to_string(),
            provider: "command".to_string(),
            command: Some("cat".to_string()),
            ..Default::default()
        });
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::TooManyResponders);
    }
}
