//! ClusterForge Simulator
//!
//! Usage:
//!   cf-sim run --catalog outcomes.json --rounds 1000 --sessions 8
//!   cf-sim run --seed 7 --rounds 20 --per-round --stages
//!   cf-sim validate outcomes.yaml
//!   cf-sim run --stages > run.txt && cf-sim inspect run.txt

mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;

use cf_engine::{EngineConfig, GameMode, OutcomeCatalog, Session, seeded};
use cf_stage::{TimingConfig, TimingProfile};

use crate::report::{SessionReport, SimulationReport, parse_traces, summary_line};

#[derive(Parser)]
#[command(name = "cf-sim", about = "ClusterForge round simulator", version)]
struct Cli {
    /// Log every cascade step (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve seeded sessions and report the results
    Run(RunArgs),
    /// Load a catalog strictly and report validation errors
    Validate {
        /// Catalog file (.json, .yaml, .yml)
        catalog: PathBuf,
    },
    /// Check and summarize stage traces written by `run --stages`
    Inspect {
        /// Output of `run --stages`; non-trace lines are ignored
        traces: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Outcome catalog (.json, .yaml, .yml); synthetic fallback if missing or unreadable
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Base seed; session N uses seed + N
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Rounds per session
    #[arg(short, long, default_value_t = 100)]
    rounds: usize,

    /// Independent sessions, resolved in parallel
    #[arg(long, default_value_t = 1)]
    sessions: usize,

    /// Cascade steps per round (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_cascades: u32,

    /// Timing profile for stage timestamps (normal, turbo, studio)
    #[arg(long, default_value = "normal", value_parser = parse_timing)]
    timing: TimingProfile,

    /// Emit a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Include a stage trace for every round
    #[arg(long)]
    stages: bool,

    /// Include every round result, not just statistics
    #[arg(long)]
    per_round: bool,
}

fn parse_timing(name: &str) -> Result<TimingProfile, String> {
    TimingProfile::from_name(name).ok_or_else(|| format!("unknown timing profile '{name}'"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Validate { catalog } => validate(&catalog),
        Commands::Inspect { traces } => inspect(&traces),
    }
}

fn load_catalog(path: Option<&Path>, seed: u64) -> Result<OutcomeCatalog> {
    let mut rng = seeded(seed);
    match path {
        Some(path) => OutcomeCatalog::load_or_fallback(path, &mut rng)
            .with_context(|| format!("invalid outcome catalog {}", path.display())),
        None => {
            log::warn!("No catalog given; using synthetic fallback");
            Ok(OutcomeCatalog::fallback(&mut rng))
        }
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let catalog = Arc::new(load_catalog(args.catalog.as_deref(), args.seed)?);
    let config = EngineConfig::default().with_max_cascade_depth(args.max_cascades);
    let timing = TimingConfig::from_profile(args.timing);

    log::info!(
        "Simulating {} session(s) x {} rounds from {} outcomes",
        args.sessions,
        args.rounds,
        catalog.len()
    );

    let sessions: Vec<SessionReport> = (0..args.sessions)
        .into_par_iter()
        .map(|index| simulate_session(&catalog, index, args, config, &timing))
        .collect();

    let report = SimulationReport::new(catalog.len(), sessions);
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
    } else {
        report.print_text();
    }
    Ok(())
}

fn simulate_session(
    catalog: &Arc<OutcomeCatalog>,
    index: usize,
    args: &RunArgs,
    config: EngineConfig,
    timing: &TimingConfig,
) -> SessionReport {
    let seed = args.seed.wrapping_add(index as u64);
    let mut session = Session::new(Arc::clone(catalog), seed)
        .with_config(config)
        .with_autoplay(true);
    let rounds = session.autoplay(args.rounds);

    let traces = if args.stages {
        rounds
            .iter()
            .enumerate()
            .map(|(n, round)| {
                round
                    .to_trace(format!("s{index}-r{n}"), timing.clone())
                    .with_session(format!("session-{index}"))
            })
            .collect()
    } else {
        Vec::new()
    };

    SessionReport {
        index,
        seed,
        stats: session.stats().clone(),
        rounds: if args.per_round { rounds } else { Vec::new() },
        traces,
    }
}

fn validate(path: &Path) -> Result<()> {
    let catalog = OutcomeCatalog::load(path)
        .with_context(|| format!("catalog {} failed validation", path.display()))?;

    println!("{}: {} outcomes OK", path.display(), catalog.len());
    for mode in [GameMode::Base, GameMode::Free] {
        let count = catalog.outcomes().iter().filter(|o| o.mode == mode).count();
        let weight: f64 = catalog
            .outcomes()
            .iter()
            .filter(|o| o.mode == mode)
            .map(|o| o.probability_weight)
            .sum();
        println!("  {:<4} {count:>4} outcomes, total weight {weight:.4}", mode.as_str());
    }
    if !catalog.has_mode(GameMode::Free) {
        log::warn!("No FREE outcomes; free rounds will draw from the whole catalog");
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let traces = parse_traces(&text)?;
    if traces.is_empty() {
        log::warn!("No stage traces in {}", path.display());
    }

    let mut total_win = 0.0;
    for trace in &traces {
        let summary = trace.summary();
        total_win += summary.total_win;
        println!("{}", summary_line(&summary));
    }
    println!("{} traces OK, total win {total_win:.2}", traces.len());
    Ok(())
}
