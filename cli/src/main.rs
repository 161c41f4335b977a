//! CLI entrypoint for booklub
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use booklub_application::{
    MatchStore, MembershipView, NoObserver, SessionObserver, VotingPorts,
};
use booklub_domain::OutputFormat;
use booklub_infrastructure::{ConfigLoader, JsonlReconciliationJournal, Scenario, ScenarioMember};
use booklub_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, RunReport, ScriptedMember,
    ScriptedRunner, SimpleProgress,
};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs are written
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting booklub");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate()?;
    let voting = config.to_voting_config();

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    if !config.output.color {
        colored::control::set_override(false);
    }

    let scenario_path = match &cli.scenario {
        Some(path) => path,
        None => bail!("A scenario file is required. Use --show-config to inspect configuration."),
    };
    let scenario = Scenario::from_path(scenario_path)
        .with_context(|| format!("Failed to load scenario {}", scenario_path.display()))?;

    // === Dependency Injection ===
    // The in-process store stands in for the shared document store
    let store = Arc::new(scenario.build_store());
    let club = scenario.seed(&store).await?;

    let journal_path = cli.journal.clone().or_else(|| config.journal.path.clone());
    let mut ports = VotingPorts::from_store(Arc::clone(&store));
    if let Some(path) = &journal_path {
        match JsonlReconciliationJournal::open(path) {
            Some(journal) => {
                info!("Journaling abandoned writes to {}", journal.path().display());
                ports = ports.with_journal(Arc::new(journal));
            }
            None => warn!("Journal {} unavailable, abandoned writes are only logged", path.display()),
        }
    }

    let show_progress = !cli.quiet && format != OutputFormat::Json;
    let observer: Arc<dyn SessionObserver> = match (show_progress, cli.verbose) {
        (false, _) => Arc::new(NoObserver),
        // Spinners and log lines on the same terminal garble each other
        (true, 0) => Arc::new(ProgressReporter::new()),
        (true, _) => Arc::new(SimpleProgress),
    };
    ports = ports.with_observer(observer);

    let mut feed = store.subscribe_by_club(&club.id).await?;

    // Print header
    if show_progress {
        println!();
        println!("+============================================================+");
        println!("|           booklub - every member likes it                  |");
        println!("+============================================================+");
        println!();
        println!("Club: {} ({})", club.name, club.id);
        println!(
            "Members: {}",
            scenario
                .members
                .iter()
                .map(|m| if m.joins_late {
                    format!("{} (joins late)", m.id)
                } else {
                    m.id.clone()
                })
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("Books: {}", scenario.items.len());
        println!();
    }

    let token = CancellationToken::new();
    tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling background retries");
                token.cancel();
            }
        }
    });

    let runner = ScriptedRunner::new(club.id.clone(), ports, voting)
        .with_reconcile(!cli.no_reconcile)
        .with_cancellation(token);

    // Founding members vote together
    let founders: Vec<ScriptedMember> = scenario.founding_members().map(script).collect();
    let mut members = runner.run_round(&founders).await;

    // Late members join, vote, and the founders catch up on their books
    let late: Vec<ScriptedMember> = scenario.late_members().map(script).collect();
    if !late.is_empty() {
        let joined = scenario.join_late(&store).await?;
        info!("{} member(s) joined late", joined.len());
        members.extend(runner.run_round(&late).await);
        members.extend(runner.run_round(&founders).await);
    }

    let report = RunReport {
        club: store.snapshot(&club.id).await?,
        members,
        matches: store.list_by_club(&club.id).await?,
        streamed: feed.drain().len(),
        pending: match &journal_path {
            Some(path) => JsonlReconciliationJournal::read_entries(path)?,
            None => Vec::new(),
        },
    };

    // Output results
    let output = ConsoleFormatter.render(format, &report);
    println!("{}", output);

    Ok(())
}

fn script(member: &ScenarioMember) -> ScriptedMember {
    ScriptedMember::new(member.member_id(), member.liked_items())
}

/// Install the tracing subscriber; logs go to stderr unless `log_file` is set
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}
