//! CLI infrastructure for the `qtable` checkpoint tool
//!
//! Creates, inspects and queries Q-table checkpoints. Training loops live in
//! the simulator driver, not here.

pub mod commands;
pub mod config;
pub mod output;
