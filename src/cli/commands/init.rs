//! Init command - Create a fresh checkpoint with a randomized Q-table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    ConfigWrite, EngineConfig, QLearner,
    cli::{
        config::{parse_labels, read_engine_config},
        output::{format_number, print_kv, print_section},
    },
};

#[derive(Parser, Debug)]
#[command(about = "Create a fresh Q-table checkpoint")]
pub struct InitArgs {
    /// Checkpoint directory (created if absent)
    #[arg(long, short = 'd')]
    pub save_dir: PathBuf,

    /// Checkpoint name (defaults to the current UNIX time)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// JSON engine config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Comma-separated attack action labels
    #[arg(long, default_value = "")]
    pub attack: String,

    /// Comma-separated retreat action labels
    #[arg(long, default_value = "")]
    pub retreat: String,
}

pub fn execute(args: InitArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => read_engine_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let engine = QLearner::new(config).context("Failed to build engine")?;
    let attack = parse_labels(&args.attack);
    let retreat = parse_labels(&args.retreat);

    let outcome = engine
        .save(&attack, &retreat, Some(args.save_dir.as_path()), args.name.as_deref())
        .with_context(|| format!("Failed to save checkpoint in {}", args.save_dir.display()))?;

    print_section("Checkpoint created");
    print_kv("Weights", &outcome.weights_path.display().to_string());
    print_kv("Config", &outcome.config_path.display().to_string());
    print_kv("Q-values", &format_number(engine.shape().len()));
    if outcome.config_write == ConfigWrite::KeptExisting {
        println!("\nNote: existing config record kept; its hyperparameters apply on load.");
    }

    Ok(())
}
