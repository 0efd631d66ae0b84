//! Inspect command - Summarize a saved checkpoint

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    QLearner, QTable,
    cli::output::{format_number, print_kv, print_section, print_stats_table, print_subsection},
};

#[derive(Parser, Debug)]
#[command(about = "Print the hyperparameters and value statistics of a checkpoint")]
pub struct InspectArgs {
    /// Path to a weight blob; its config record is read from the same directory
    pub weights: PathBuf,
}

/// Summary statistics over all Q-values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ValueStats {
    pub fn of(table: &QTable) -> Self {
        let values = table.values();
        let (min, max, sum) = values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );
        Self {
            min,
            max,
            mean: sum / values.len() as f64,
        }
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let loaded = QLearner::load(&args.weights)
        .with_context(|| format!("Failed to load checkpoint {}", args.weights.display()))?;
    let engine = &loaded.engine;
    let hyper = engine.hyperparameters();

    print_section(&format!("Checkpoint {}", args.weights.display()));
    print_stats_table(&[
        ("Learning rate", hyper.learning_rate.to_string()),
        ("Discount factor", hyper.discount_factor.to_string()),
        ("Action space", hyper.action_space_size.to_string()),
        ("Field resolution", hyper.field_resolution.to_string()),
        ("Table shape", format!("{:?}", engine.shape().dims())),
    ]);

    print_subsection("Actions");
    print_kv("Attack", &loaded.attack_actions.join(", "));
    print_kv("Retreat", &loaded.retreat_actions.join(", "));

    let stats = ValueStats::of(engine.q_table());
    print_subsection("Q-values");
    print_stats_table(&[
        ("Count", format_number(engine.shape().len())),
        ("Min", format!("{:.4}", stats.min)),
        ("Max", format!("{:.4}", stats.max)),
        ("Mean", format!("{:.4}", stats.mean)),
    ]);

    Ok(())
}
