//! Configuration types for engine creation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.95;
pub const DEFAULT_ACTION_SPACE_SIZE: usize = 7;
/// Side length of one field cell, in metres.
pub const DEFAULT_FIELD_RESOLUTION: usize = 10;
pub const DEFAULT_INIT_LOW: f64 = -2.0;
pub const DEFAULT_INIT_HIGH: f64 = 0.0;

/// Hyperparameters fixed for the lifetime of one engine.
///
/// These are exactly the values recorded in a checkpoint's config record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// α, in `[0, 1]`
    pub learning_rate: f64,
    /// γ, in `[0, 1]`
    pub discount_factor: f64,
    pub action_space_size: usize,
    pub field_resolution: usize,
}

impl Hyperparameters {
    /// Check ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(Error::invalid_config(format!(
                "learning_rate {} must be within [0, 1]",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::invalid_config(format!(
                "discount_factor {} must be within [0, 1]",
                self.discount_factor
            )));
        }
        if self.action_space_size == 0 {
            return Err(Error::invalid_config("action_space_size must be positive"));
        }
        if self.field_resolution == 0 {
            return Err(Error::invalid_config("field_resolution must be positive"));
        }
        Ok(())
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
            action_space_size: DEFAULT_ACTION_SPACE_SIZE,
            field_resolution: DEFAULT_FIELD_RESOLUTION,
        }
    }
}

/// Range the initial Q-values are drawn from, `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitRange {
    pub low: f64,
    pub high: f64,
}

impl InitRange {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let range = Self { low, high };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.low.is_finite() && self.high.is_finite() && self.low < self.high {
            Ok(())
        } else {
            Err(Error::invalid_config(format!(
                "initial value range [{}, {}) must be finite and non-empty",
                self.low, self.high
            )))
        }
    }
}

impl Default for InitRange {
    fn default() -> Self {
        Self {
            low: DEFAULT_INIT_LOW,
            high: DEFAULT_INIT_HIGH,
        }
    }
}

/// Configuration for creating a [`crate::QLearner`].
///
/// # Examples
///
/// ```
/// use aquaticus_qtable::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_learning_rate(0.5)
///     .with_discount_factor(0.9)
///     .with_action_space_size(4)
///     .with_seed(42)
///     .with_save_dir("models/run1");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub hyperparameters: Hyperparameters,
    pub init_range: InitRange,
    /// Random seed for reproducibility (None = seeded from the OS)
    pub seed: Option<u64>,
    /// Directory used by `save` when the caller does not pass one
    pub save_dir: Option<PathBuf>,
    /// Log the table shape at construction
    pub verbose: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.hyperparameters.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.hyperparameters.discount_factor = discount_factor;
        self
    }

    pub fn with_action_space_size(mut self, action_space_size: usize) -> Self {
        self.hyperparameters.action_space_size = action_space_size;
        self
    }

    pub fn with_field_resolution(mut self, field_resolution: usize) -> Self {
        self.hyperparameters.field_resolution = field_resolution;
        self
    }

    pub fn with_init_range(mut self, low: f64, high: f64) -> Self {
        self.init_range = InitRange { low, high };
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_save_dir(mut self, save_dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(save_dir.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.hyperparameters.validate()?;
        self.init_range.validate()
    }
}

impl From<Hyperparameters> for EngineConfig {
    fn from(hyperparameters: Hyperparameters) -> Self {
        Self {
            hyperparameters,
            ..Self::default()
        }
    }
}
