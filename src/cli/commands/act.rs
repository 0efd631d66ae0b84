//! Act command - Query the action chosen for one observation

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    Observation, QLearner,
    cli::output::{print_kv, print_section},
};

#[derive(Parser, Debug)]
#[command(about = "Discretize one observation and print the selected action")]
pub struct ActArgs {
    /// Path to a weight blob
    pub weights: PathBuf,

    #[arg(long, allow_hyphen_values = true)]
    pub own_x: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub own_y: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub enemy_x: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub enemy_y: f64,

    /// Opponent heading in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub enemy_heading: f64,

    /// The agent currently holds the flag
    #[arg(long)]
    pub has_flag: bool,

    /// Exploration rate; omit for the greedy action
    #[arg(long, short = 'e')]
    pub epsilon: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Label of `action`: retreat labels while holding the flag, attack labels
/// otherwise.
pub fn action_label<'a>(
    action: usize,
    has_flag: bool,
    attack: &'a [String],
    retreat: &'a [String],
) -> Option<&'a str> {
    let labels = if has_flag { retreat } else { attack };
    labels.get(action).map(String::as_str)
}

pub fn execute(args: ActArgs) -> Result<()> {
    let loaded = match args.seed {
        Some(seed) => QLearner::load_with_seed(&args.weights, seed),
        None => QLearner::load(&args.weights),
    }
    .with_context(|| format!("Failed to load checkpoint {}", args.weights.display()))?;
    let mut engine = loaded.engine;

    anyhow::ensure!(
        args.own_x.is_finite()
            && args.own_y.is_finite()
            && args.enemy_x.is_finite()
            && args.enemy_y.is_finite()
            && args.enemy_heading.is_finite(),
        "observation values must be finite"
    );

    let observation = Observation {
        own: (args.own_x, args.own_y),
        opponent: (args.enemy_x, args.enemy_y),
        opponent_heading: args.enemy_heading,
        has_flag: args.has_flag,
    };
    let state = engine.discretize(&observation);
    let action = engine.get_action(state, args.epsilon);

    print_section("Decision");
    print_kv("State", &state.to_string());
    print_kv("Q-values", &format!("{:?}", engine.q_table().row(state)));
    print_kv("Action", &action.to_string());
    if let Some(label) = action_label(
        action,
        state.has_flag(),
        &loaded.attack_actions,
        &loaded.retreat_actions,
    ) {
        print_kv("Label", label);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_label_picks_mode() {
        let attack = vec!["grab".to_string(), "left".to_string()];
        let retreat = vec!["home".to_string()];
        assert_eq!(action_label(1, false, &attack, &retreat), Some("left"));
        assert_eq!(action_label(0, true, &attack, &retreat), Some("home"));
        assert_eq!(action_label(1, true, &attack, &retreat), None);
    }
}
