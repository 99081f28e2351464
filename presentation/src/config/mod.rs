//! Presentation-level configuration
//!
//! Resolves how results are shown from command-line flags layered over
//! the values of the `[output]` config section.

use crate::cli::commands::Cli;
use deliberation_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Flags win over file values; `--quiet` and JSON output hide progress.
    pub fn resolve(
        cli: &Cli,
        file_format: Option<OutputFormat>,
        file_color: bool,
        file_show_progress: bool,
    ) -> Self {
        let format = cli
            .output
            .map(OutputFormat::from)
            .or(file_format)
            .unwrap_or_default();
        Self {
            format,
            color: file_color,
            show_progress: file_show_progress && !cli.quiet && format != OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flag_overrides_file() {
        let cli = Cli::try_parse_from(["deliberate", "-o", "full", "Q?"]).unwrap();
        let config = OutputConfig::resolve(&cli, Some(OutputFormat::Json), false, true);
        assert_eq!(config.format, OutputFormat::Full);
        assert!(!config.color);
        assert!(config.show_progress);
    }

    #[test]
    fn test_file_format_and_default() {
        let cli = Cli::try_parse_from(["deliberate", "Q?"]).unwrap();
        assert_eq!(
            OutputConfig::resolve(&cli, Some(OutputFormat::Full), true, true).format,
            OutputFormat::Full
        );
        assert_eq!(
            OutputConfig::resolve(&cli, None, true, true),
            OutputConfig::default()
        );
    }

    #[test]
    fn test_progress_hidden_for_quiet_and_json() {
        let quiet = Cli::try_parse_from(["deliberate", "-q", "Q?"]).unwrap();
        assert!(!OutputConfig::resolve(&quiet, None, true, true).show_progress);

        let json = Cli::try_parse_from(["deliberate", "-o", "json", "Q?"]).unwrap();
        assert!(!OutputConfig::resolve(&json, None, true, true).show_progress);
    }
}
