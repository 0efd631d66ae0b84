//! Tabular Q-learning decision engine for capture-the-flag pursuit agents
//!
//! This crate provides:
//! - Discretization of continuous sensor readings into a bounded state tuple
//! - A dense Q-table with epsilon-greedy action selection and one-step backups
//! - Checkpoint persistence (JSON config record + MessagePack weight blob)
//! - A rectangular field grid as the default position discretizer

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use adapters::{FieldBounds, FieldDiscretizer};
pub use config::{EngineConfig, Hyperparameters, InitRange};
pub use error::{Error, Result};
pub use q_learning::{
    CheckpointConfig, ConfigWrite, LoadedModel, Observation, QLearner, QTable, SaveOutcome,
    StateDiscretizer,
};
pub use types::{DiscreteState, TableShape};
