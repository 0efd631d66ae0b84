//! Tabular Q-learning over a discretized capture-the-flag state space
//!
//! ## Pipeline
//!
//! ```text
//! Observation --StateDiscretizer--> DiscreteState --QTable--> action
//!                                                    |
//!                                      update_table / set_qvalue
//!                                                    |
//!                                     save / load (serialization)
//! ```
//!
//! ## State space
//!
//! | Axis | Buckets |
//! |------|---------|
//! | Own position | field grid cells |
//! | Distance to opponent | 5 (≤5, ≤6, ≤7, ≤9, >9 m) |
//! | Opponent heading | 12 (30° each) |
//! | Holding the flag | 2 |
//! | Action | `action_space_size` |
//!
//! ## Usage Example
//!
//! ```no_run
//! use aquaticus_qtable::{EngineConfig, QLearner};
//!
//! let mut engine = QLearner::new(EngineConfig::new().with_save_dir("models/run1"))?;
//! let state = engine.get_state(10.0, 5.0, 14.0, 8.0, 270.0, false);
//! let action = engine.get_action(state, Some(0.2));
//! # let _ = action;
//! engine.save(&["attack"], &["retreat"], None, None)?;
//!
//! let loaded = QLearner::load("models/run1/1700000000.msgpack")?;
//! println!("attack actions: {:?}", loaded.attack_actions);
//! # Ok::<(), aquaticus_qtable::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;
pub mod state;

// Public re-exports
pub use agent::{LoadedModel, QLearner};
pub use q_table::QTable;
pub use serialization::{CheckpointConfig, ConfigWrite, SaveOutcome, WeightBlob};
pub use state::{Observation, StateDiscretizer};
