#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for the Flashpoint rescue simulation.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use flashpoint_core::Snapshot;
use flashpoint_engine::{GameConfig, Session};
use flashpoint_system_policy::PolicyKind;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs a game and prints snapshots as JSON on stdout.
#[derive(Debug, Parser)]
#[command(name = "flashpoint", version, about = "Turn-based fire rescue simulation")]
struct Cli {
    /// TOML configuration file; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of firefighters.
    #[arg(long)]
    agents: Option<usize>,
    /// Maximum victims on the board or being carried.
    #[arg(long = "max-pois")]
    max_pois: Option<usize>,
    /// Firefighter policy: `random` or `role_directed`.
    #[arg(long)]
    policy: Option<PolicyKind>,
    /// Seed of the game's random generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of turns to play.
    #[arg(long, default_value_t = 1_000)]
    turns: u64,
    /// Print a snapshot after every turn as JSON lines.
    #[arg(long)]
    trace: bool,
    /// Pretty-print the final snapshot.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut session = Session::new(config);
    let mut snapshot = session
        .initialize(cli.agents, cli.max_pois)
        .context("failed to initialize the game")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.trace {
        emit_line(&mut out, &snapshot)?;
    }

    let mut played = 0;
    while played < cli.turns && snapshot.running {
        snapshot = session.advance().context("failed to advance the game")?;
        played += 1;
        if cli.trace {
            emit_line(&mut out, &snapshot)?;
        }
    }

    info!(
        turns = played,
        result = ?snapshot.result,
        rescued = snapshot.stats.victims_rescued,
        lost = snapshot.stats.victims_lost,
        damage = snapshot.stats.building_damage,
        "run finished"
    );

    if !cli.trace {
        let written = if cli.pretty {
            serde_json::to_writer_pretty(&mut out, &snapshot)
        } else {
            serde_json::to_writer(&mut out, &snapshot)
        };
        written.context("failed to write snapshot")?;
        writeln!(out).context("failed to write snapshot")?;
    }
    Ok(())
}

fn emit_line(out: &mut impl Write, snapshot: &Snapshot) -> Result<()> {
    serde_json::to_writer(&mut *out, snapshot).context("failed to write snapshot")?;
    writeln!(out).context("failed to write snapshot")?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
