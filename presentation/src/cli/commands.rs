//! CLI command definitions

use clap::{Parser, ValueEnum};
use deliberation_domain::OutputFormat;
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Full report with every phase
    Full,
    /// Only the final answer
    Result,
    /// The whole session as JSON
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Full => OutputFormat::Full,
            OutputArg::Result => OutputFormat::Result,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for quorum-deliberation
#[derive(Parser, Debug)]
#[command(name = "deliberate")]
#[command(author, version, about = "Multi-responder deliberation - independent answers, debate, consensus")]
#[command(long_about = r#"
Deliberate sends a question to several AI responders and refines their
answers into one solution.

The process has four phases:
1. Collection: every responder answers independently, in parallel
2. Analysis:   common themes, approaches and differences are extracted
3. Debate:     responders critique each other until positions converge
4. Consensus:  final proposals are clustered; a majority wins, otherwise
               a hybrid is synthesized and put to a vote

With a single responder (or --direct) the question is answered directly.

Configuration files are loaded from (in priority order):
1. DELIBERATION_* environment variables
2. --config <path>           Explicit config file
3. ./deliberation.toml       Project-level config
4. ~/.config/quorum-deliberation/config.toml   Global config

Example:
  deliberate "How should we shard the session store?"
  deliberate -r gpt -r local -o full "Compare retry strategies"
  deliberate --direct -r local "Summarize RFC 9110 in one paragraph"
"#)]
pub struct Cli {
    /// The question to deliberate on
    #[arg(required_unless_present = "show_config")]
    pub question: Option<String>,

    /// Responders to include (can be specified multiple times; default: all enabled)
    #[arg(short, long = "responder", value_name = "ID")]
    pub responders: Vec<String>,

    /// User id recorded on the query
    #[arg(long, value_name = "ID")]
    pub user: Option<String>,

    /// Answer with a single responder, skipping debate and consensus
    #[arg(long)]
    pub direct: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write tracing logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append a JSONL transcript of the deliberation to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

impl Cli {
    /// Explicit responder selection, if any
    pub fn responder_selection(&self) -> Option<&[String]> {
        (!self.responders.is_empty()).then_some(self.responders.as_slice())
    }

    /// Tracing filter directive for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
