//! Common test utilities for the Q-table test suite.

#![allow(dead_code)]

use aquaticus_qtable::{
    DiscreteState, EngineConfig, Observation, QLearner, ports::PositionDiscretizer,
};

/// Position discretizer that puts every position into one cell.
pub struct SingleCell;

impl PositionDiscretizer for SingleCell {
    fn to_discrete_idx(&self, _x: f64, _y: f64) -> usize {
        0
    }

    fn space_size(&self) -> usize {
        1
    }
}

/// Seeded engine with a small action space and easy rates.
pub fn seeded_engine(learning_rate: f64, discount_factor: f64, seed: u64) -> QLearner {
    QLearner::new(
        EngineConfig::new()
            .with_learning_rate(learning_rate)
            .with_discount_factor(discount_factor)
            .with_action_space_size(4)
            .with_seed(seed),
    )
    .expect("valid engine config")
}

/// Observation with the agent at the origin and the opponent `dx` metres east.
pub fn observation(dx: f64, heading: f64, has_flag: bool) -> Observation {
    Observation {
        own: (0.0, 0.0),
        opponent: (dx, 0.0),
        opponent_heading: heading,
        has_flag,
    }
}

/// Set every action value of `state` to `value`.
pub fn fill_row(engine: &mut QLearner, state: DiscreteState, value: f64) {
    for action in 0..engine.shape().action_space_size() {
        engine.set_qvalue(state, action, value);
    }
}
