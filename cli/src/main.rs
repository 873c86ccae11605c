//! CLI entrypoint for Expert Debate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use debate_application::{
    ConversationLogger, DebateOutcome, DebateProgressNotifier, DebateStore, FinalizeDebateUseCase,
    HistoryStore, NoConversationLogger, NoHistoryStore, NoProgress, PanelOptions,
    StartDebateUseCase, TurnScheduler,
};
use debate_domain::{DebateId, ExpertId, OutputFormat, Topic};
use debate_infrastructure::{
    ConfigIssue, ConfigLoader, FileConfig, JsonHistoryStore, JsonlConversationLogger,
    OpenAiTextGenerator, Severity, TomlPanelSource,
};
use debate_presentation::{
    Cli, ConsoleFormatter, ContinueDecision, ProgressReporter, SimpleProgress, disable_color,
    prompt_vote, wait_for_continue,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Retries allowed for a single cell before giving up
const MAX_RETRIES: u32 = 3;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = load_config(&cli)?;
    if cli.no_color || !config.output.color {
        disable_color();
    }
    let format = cli.output.or(config.output.format).unwrap_or_default();

    // === Dependency Injection ===
    let store = DebateStore::new();
    let params = config.scheduling_params();

    let history_store: Arc<dyn HistoryStore> = match config
        .history
        .enabled
        .then(|| config.history.resolved_path())
        .flatten()
    {
        Some(path) => Arc::new(JsonHistoryStore::new(path)),
        None => Arc::new(NoHistoryStore),
    };

    let log_path = cli
        .log
        .clone()
        .or_else(|| config.log.conversation_log.as_ref().map(PathBuf::from));
    let logger: Arc<dyn ConversationLogger> = match log_path.and_then(JsonlConversationLogger::open)
    {
        Some(logger) => {
            info!("Logging debate events to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    };

    let finalize = FinalizeDebateUseCase::new(store.clone(), history_store)
        .with_policy(params.ballot_policy)
        .with_conversation_logger(logger.clone());

    match finalize.restore_history() {
        Ok(count) => info!("Restored {} archived debates", count),
        Err(e) => warn!("Starting with an empty history: {}", e),
    }

    if cli.is_history_query() {
        return show_history(&cli, &store, format);
    }

    // Panel and topic
    let Some(panel_path) = cli.panel.clone() else {
        bail!("A panel file is required. Use --history to browse past debates.");
    };
    let panel_source = Arc::new(TomlPanelSource::new(&panel_path));
    let topic = match &cli.topic {
        Some(title) => Topic::new(slugify(title), title.as_str())?,
        None => panel_source.topic()?.ok_or_else(|| {
            anyhow!(
                "No topic given. Pass --topic or add a [topic] table to {}",
                panel_path.display()
            )
        })?,
    };

    let mut options: PanelOptions = config.panel.clone();
    if let Some(count) = cli.count {
        options.count = count;
    }
    if cli.real_only {
        options.allow_fictional = false;
    }

    let generator = Arc::new(
        OpenAiTextGenerator::new(&config.generator).context("Failed to build the generator")?,
    );
    if config.generator.resolve_api_key().is_none() {
        warn!(
            "No API key found in ${}; requests to {} may be rejected",
            config.generator.api_key_env, config.generator.base_url
        );
    }

    let debate_id = StartDebateUseCase::new(panel_source, store.clone())
        .with_conversation_logger(logger.clone())
        .execute(topic, &options)
        .await?;

    let live = !cli.quiet && format == OutputFormat::Full;
    let progress: Box<dyn DebateProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if live {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    if live && let Some(debate) = store.current_snapshot() {
        println!();
        println!("+============================================================+");
        println!("|                      Expert Debate                         |");
        println!("+============================================================+");
        println!();
        println!("Topic: {}", debate.topic());
        println!(
            "Panel: {}",
            debate
                .panel()
                .iter()
                .map(|e| e.label())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let auto_advance = params.auto_advance && !cli.manual;
    let scheduler = TurnScheduler::new(
        store.clone(),
        generator.clone(),
        params.with_auto_advance(auto_advance),
    )?
    .with_conversation_logger(logger);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    // Debate loop
    let mut retries = RetryBudget::new(MAX_RETRIES);
    loop {
        match scheduler.run(progress.as_ref(), &cancel).await {
            Ok(DebateOutcome::Completed) => break,
            Ok(DebateOutcome::Cancelled) => {
                eprintln!("Debate {} interrupted; it was not archived.", debate_id);
                return Ok(());
            }
            Ok(DebateOutcome::Paused) => match wait_for_continue(&cancel).await {
                ContinueDecision::Next => {}
                ContinueDecision::Auto => scheduler.set_auto_advance(true),
                ContinueDecision::Quit => {
                    eprintln!("Debate {} stopped; it was not archived.", debate_id);
                    return Ok(());
                }
            },
            Err(e) if e.is_retryable() => {
                if !retries.allow_retry(scheduler.cursor().cells_passed()) {
                    return Err(e).context("The debate could not continue");
                }
                warn!(
                    "Statement failed ({}/{}): {}",
                    retries.failures, MAX_RETRIES, e
                );
            }
            Err(e) => return Err(e).context("The debate could not continue"),
        }
    }

    // Voting and archive
    let vote = match &cli.vote {
        Some(id) => Some(ExpertId::from(id.as_str())),
        None if !cli.finish && live && std::io::stdin().is_terminal() => {
            match store.current_snapshot() {
                Some(debate) => prompt_vote(debate.panel()).await,
                None => None,
            }
        }
        None => None,
    };

    if let Some(expert_id) = vote {
        match finalize.cast_vote(&expert_id) {
            Ok(receipt) => {
                if live && let Some(debate) = store.current_snapshot() {
                    println!("\n{}", ConsoleFormatter::format_vote_receipt(&debate, &receipt));
                }
            }
            Err(e) if e.is_rejected() => eprintln!("Vote not counted: {}", e),
            Err(e) => return Err(e.into()),
        }
    }
    finalize.finish()?;

    if cli.summarize {
        match finalize.summarize(generator.as_ref()).await {
            Ok(summary) => {
                if live {
                    println!("{}", ConsoleFormatter::format_summary(&summary));
                }
            }
            Err(e) => eprintln!("Summary unavailable: {}", e),
        }
    }

    if !live {
        let debate = store
            .current_snapshot()
            .ok_or_else(|| anyhow!("debate {} is no longer available", debate_id))?;
        println!("{}", ConsoleFormatter::render(&debate, format));
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("config: {}", issue.message()),
            Severity::Error => eprintln!("config error: {}", issue.message()),
        }
    }
    if ConfigIssue::has_errors(&issues) {
        bail!("Invalid configuration");
    }
    Ok(config)
}

fn show_history(cli: &Cli, store: &DebateStore, format: OutputFormat) -> Result<()> {
    let entries = store.history();

    if let Some(id) = &cli.show {
        let id = DebateId::new(id.as_str());
        let entry = entries
            .iter()
            .find(|e| e.id() == &id)
            .ok_or_else(|| anyhow!("No archived debate with id {}", id))?;
        println!("{}", ConsoleFormatter::render(entry.debate(), format));
        return Ok(());
    }

    let output = match format {
        OutputFormat::Json => ConsoleFormatter::format_history_json(&entries),
        _ => ConsoleFormatter::format_history(&entries),
    };
    println!("{}", output);
    Ok(())
}

/// Failures counted against the cell that is currently blocking the debate
struct RetryBudget {
    max: u32,
    failures: u32,
    at_cell: usize,
}

impl RetryBudget {
    fn new(max: u32) -> Self {
        Self {
            max,
            failures: 0,
            at_cell: 0,
        }
    }

    /// Record a failure with the cursor at `cells_passed`.
    ///
    /// Returns `false` once the cell has used up its retries. The count
    /// starts over whenever the cursor has moved since the last failure.
    fn allow_retry(&mut self, cells_passed: usize) -> bool {
        if cells_passed != self.at_cell {
            self.at_cell = cells_passed;
            self.failures = 0;
        }
        if self.failures >= self.max {
            return false;
        }
        self.failures += 1;
        true
    }
}

/// Topic id derived from a free-form title
fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
