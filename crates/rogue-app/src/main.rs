use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};

use rogue_app::logging::{init_logging, LogConfig};
use rogue_app::script::demo_script;
use rogue_app::state::AppState;
use rogue_app::summary::RunSummary;
use rogue_core::config::TuningConfig;
use rogue_sim::SimConfig;

/// Run the demonstration arena headless and print a JSON run summary.
#[derive(Debug, Parser)]
#[command(name = "rogue", version)]
struct Cli {
    /// Tuning overrides as JSON; defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Real seconds to run before shutting down.
    #[arg(long, default_value_t = 20.0)]
    seconds: f32,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,

    #[arg(long)]
    json_logs: bool,
}

fn run_length(seconds: f32) -> Result<Duration> {
    match Duration::try_from_secs_f32(seconds) {
        Ok(length) if !length.is_zero() => Ok(length),
        _ => bail!("--seconds must be a positive, finite duration, got {seconds}"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        level: cli.log_level,
        json: cli.json_logs,
        ..Default::default()
    })?;

    if cli.fps == 0 {
        bail!("--fps must be positive");
    }
    let run_length = run_length(cli.seconds)?;

    let tuning = match &cli.config {
        Some(path) => TuningConfig::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => TuningConfig::default(),
    };

    let state = AppState::new();
    state.start(
        SimConfig {
            seed: cli.seed,
            tuning,
        },
        cli.fps,
    )?;

    let started = Instant::now();
    for input in demo_script() {
        let due = Duration::from_secs_f32(input.at);
        if due >= run_length {
            break;
        }
        if let Some(wait) = due.checked_sub(started.elapsed()) {
            std::thread::sleep(wait);
        }
        state.send(input.command)?;
    }
    if let Some(wait) = run_length.checked_sub(started.elapsed()) {
        std::thread::sleep(wait);
    }

    let snapshot = state
        .shutdown()?
        .context("the game loop produced no frames")?;
    let summary = RunSummary::from_snapshot(cli.seed, &snapshot);
    info!(phase = ?summary.phase, score = summary.score, "run finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
