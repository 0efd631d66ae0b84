//! qtable CLI - create, inspect and query Q-table checkpoints

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qtable")]
#[command(version, about = "Q-table checkpoint toolkit for capture-the-flag agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh checkpoint with a randomized Q-table
    Init(aquaticus_qtable::cli::commands::init::InitArgs),

    /// Summarize a saved checkpoint
    Inspect(aquaticus_qtable::cli::commands::inspect::InspectArgs),

    /// Select an action for one observation
    Act(aquaticus_qtable::cli::commands::act::ActArgs),
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => aquaticus_qtable::cli::commands::init::execute(args),
        Commands::Inspect(args) => aquaticus_qtable::cli::commands::inspect::execute(args),
        Commands::Act(args) => aquaticus_qtable::cli::commands::act::execute(args),
    }
}
