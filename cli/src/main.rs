//! CLI entrypoint for quorum-deliberation
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use deliberation_application::{
    CircuitBreakerRegistry, ConversationLogger, DeliberationInput, DeliberationOutput,
    NoConversationLogger, NoProgress, ProgressNotifier, ResilientCaller, RunDeliberationUseCase,
    RunDirectUseCase,
};
use deliberation_domain::Query;
use deliberation_infrastructure::{
    ConfigLoader, FileConfig, InMemorySessionStore, JsonlConversationLogger, ResponderRegistry,
};
use deliberation_presentation::{
    Cli, ConsoleFormatter, OutputConfig, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber. The returned guard flushes the log
/// file on drop and must outlive every log call.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    // RUST_LOG wins over -v when set
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!("{}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting quorum-deliberation");

    let config = load_config(&cli)?;
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("{}", issue.to_string().red());
        } else {
            warn!("{}", issue);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }

    let output_config = OutputConfig::resolve(
        &cli,
        config.output.format,
        config.output.color,
        config.output.show_progress,
    );
    if !output_config.color {
        colored::control::set_override(false);
    }

    let question = match &cli.question {
        Some(q) if !q.trim().is_empty() => q.clone(),
        _ => bail!("A question is required"),
    };
    let user_id = cli
        .user
        .clone()
        .unwrap_or_else(|| config.deliberation.user_id.clone());
    let query = Query::try_new(question, user_id).context("Question cannot be empty")?;

    // === Dependency Injection ===
    let registry = ResponderRegistry::from_config(&config.responders)?;
    let responders = registry.select(cli.responder_selection())?;
    if responders.is_empty() {
        bail!("No responders available; add [[responders]] to your configuration");
    }

    let params = config.to_params();
    let breakers = Arc::new(CircuitBreakerRegistry::new(
        params.resilience.circuit_breaker.clone(),
    ));
    let caller = ResilientCaller::new(params.resilience.clone(), breakers);
    let store = Arc::new(InMemorySessionStore::new());

    let transcript_path = cli.transcript.clone().or(config.output.transcript.clone());
    let conversation_logger: Arc<dyn ConversationLogger> = match transcript_path {
        Some(path) => Arc::new(
            JsonlConversationLogger::open(&path)
                .with_context(|| format!("Cannot open transcript {}", path.display()))?,
        ),
        None => Arc::new(NoConversationLogger),
    };

    let progress: Box<dyn ProgressNotifier> = if !output_config.show_progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let result: DeliberationOutput = if cli.direct || responders.len() == 1 {
        if responders.len() > 1 {
            info!(
                "--direct given with {} responders; using {}",
                responders.len(),
                responders[0].id()
            );
        }
        RunDirectUseCase::new(store, caller, params.collection_timeout)
            .with_conversation_logger(conversation_logger)
            .execute_with_progress(query, responders[0].clone(), progress.as_ref())
            .await?
    } else {
        RunDeliberationUseCase::new(store, params, caller)
            .with_conversation_logger(conversation_logger)
            .execute_with_progress(DeliberationInput::new(query, responders), progress.as_ref())
            .await?
    };

    info!("Session {} finished", result.session_id);
    println!("{}", ConsoleFormatter::render(&result.session, output_config.format));

    Ok(())
}
