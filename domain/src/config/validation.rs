//! Structured configuration issues.
//!
//! Loaders report problems as [`ConfigIssue`] values instead of failing
//! on the first one, so every problem can be shown at once. Errors block
//! a run; warnings are printed and ignored.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot work.
    Error,
    /// The configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No enabled responder is configured.
    NoResponders,
    /// Two responder entries share an id.
    DuplicateResponderId,
    /// A responder names a provider kind nobody implements.
    UnknownProvider,
    /// A provider entry lacks a setting it needs (model, command, ...).
    MissingProviderSetting,
    /// More enabled responders than a deliberation accepts.
    TooManyResponders,
    /// A single enabled responder: only the direct path can run.
    SingleResponder,
    /// A threshold or limit is outside its valid range.
    OutOfRange,
    /// `min_rounds` exceeds `max_rounds`.
    InvalidRoundLimits,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
