//! Headless tools for dash levels: generate, validate, migrate and replay.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dash_core::{
    GameConfig, GameState, InputState, Level, StepOutcome, generate_level, load_level, save_level,
    step,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dash", version, about)]
struct Args {
    /// JSON config file; missing fields take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a random level and write it as a current-format file.
    Generate {
        /// RNG seed. Falls back to the config seed, then to a random one.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Check that a level file loads, and print a summary.
    Validate { file: PathBuf },
    /// Rewrite a level file (any supported version) in the current format.
    Migrate { input: PathBuf, output: PathBuf },
    /// Replay a level headlessly with scripted jumps.
    Simulate {
        file: PathBuf,
        /// Frame at which jump is pressed. May be repeated.
        #[arg(long = "jump-at", value_name = "FRAME")]
        jump_at: Vec<u64>,
        #[arg(long, default_value_t = 20_000)]
        max_frames: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    match args.command {
        Command::Generate { seed, out } => generate(&config, seed, &out),
        Command::Validate { file } => validate(&file),
        Command::Migrate { input, output } => migrate(&input, &output),
        Command::Simulate {
            file,
            jump_at,
            max_frames,
        } => simulate(&config, &file, &jump_at, max_frames),
    }
}

fn generate(config: &GameConfig, seed: Option<u64>, out: &Path) -> anyhow::Result<()> {
    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    let level = generate_level(&mut ChaCha8Rng::seed_from_u64(seed), &config.generator);
    save_level(&level, out).with_context(|| format!("writing {}", out.display()))?;

    tracing::info!(seed, path = %out.display(), objects = level.objects.len(), "Generated level");
    Ok(())
}

fn summary(level: &Level) -> serde_json::Value {
    serde_json::json!({
        "length_cells": level.length_cells,
        "height_cells": level.height_cells,
        "objects": level.objects.len(),
        "spikes": level.spikes().count(),
        "solids": level.solids().count(),
        "unknown": level.objects.iter().filter(|o| !o.kind.is_known()).count(),
    })
}

fn validate(file: &Path) -> anyhow::Result<()> {
    let level = load_level(file).with_context(|| format!("validating {}", file.display()))?;
    println!("{}", serde_json::to_string_pretty(&summary(&level))?);
    Ok(())
}

fn migrate(input: &Path, output: &Path) -> anyhow::Result<()> {
    let level = load_level(input).with_context(|| format!("reading {}", input.display()))?;
    save_level(&level, output).with_context(|| format!("writing {}", output.display()))?;

    tracing::info!(from = %input.display(), to = %output.display(), "Migrated level");
    Ok(())
}

fn simulate(
    config: &GameConfig,
    file: &Path,
    jump_at: &[u64],
    max_frames: u64,
) -> anyhow::Result<()> {
    let level = load_level(file).with_context(|| format!("reading {}", file.display()))?;
    let jumps: BTreeSet<u64> = jump_at.iter().copied().collect();
    let dt = config.timing.fixed_dt;

    let mut state = GameState::from_level(Arc::new(level), &config.physics);
    let outcome = loop {
        if state.frame >= max_frames {
            bail!("run still going after {max_frames} frames");
        }
        let input = if jumps.contains(&state.frame) {
            InputState::JUMP
        } else {
            InputState::NONE
        };
        match step(&state, input, dt) {
            StepOutcome::Running(next) => state = next,
            StepOutcome::Died(death) => break format!("died ({death:?})"),
            StepOutcome::Completed => break "completed".to_owned(),
        }
    };

    let report = serde_json::json!({
        "outcome": outcome,
        "frame": state.frame,
        "progress": state.progress(),
        "hash": format!("{:016x}", state.compute_hash()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
