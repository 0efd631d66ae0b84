//! Q-learning decision engine
//!
//! Owns the hyperparameters, the state discretizer, the Q-table and the
//! random source, and exposes the call surface a simulator bridge drives.

use std::path::{Path, PathBuf};

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    Error, Result,
    adapters::FieldDiscretizer,
    config::{EngineConfig, Hyperparameters},
    q_learning::{
        q_table::QTable,
        serialization::{self, CheckpointConfig, SaveOutcome},
        state::{Observation, StateDiscretizer},
    },
    types::{DiscreteState, TableShape},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning engine for one capture-the-flag agent.
///
/// Not meant for shared mutation: one owner drives `get_action`,
/// `update_table` and `set_qvalue` sequentially. Readers on other threads
/// work on a [`QLearner::snapshot`].
///
/// # Examples
///
/// ```
/// use aquaticus_qtable::{EngineConfig, QLearner};
///
/// let mut engine = QLearner::new(
///     EngineConfig::new()
///         .with_learning_rate(0.5)
///         .with_action_space_size(4)
///         .with_seed(7),
/// )?;
///
/// let state = engine.get_state(0.0, 0.0, 3.0, 4.0, 90.0, false);
/// let action = engine.get_action(state, Some(0.1));
/// let next = engine.get_state(1.0, 0.0, 3.0, 4.0, 95.0, false);
/// engine.update_table(state, action, -1.0, next);
/// # Ok::<(), aquaticus_qtable::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct QLearner {
    hyperparameters: Hyperparameters,
    discretizer: StateDiscretizer<FieldDiscretizer>,
    q_table: QTable,
    rng: StdRng,
    rng_seed: Option<u64>,
    save_dir: Option<PathBuf>,
}

/// An engine restored from a checkpoint, with the action labels recorded
/// alongside it.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub engine: QLearner,
    pub attack_actions: Vec<String>,
    pub retreat_actions: Vec<String>,
}

impl QLearner {
    /// Create an engine with a freshly randomized Q-table.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let hyper = config.hyperparameters;

        let field = FieldDiscretizer::new(hyper.field_resolution)?;
        let discretizer = StateDiscretizer::new(field);
        let shape = TableShape::new(discretizer.own_space_size(), hyper.action_space_size)?;

        let mut rng = build_rng(config.seed);
        let q_table = QTable::random(
            shape,
            hyper.learning_rate,
            hyper.discount_factor,
            config.init_range,
            &mut rng,
        )?;

        if config.verbose {
            info!(shape = ?shape.dims(), "constructed Q-table");
        }

        Ok(Self {
            hyperparameters: hyper,
            discretizer,
            q_table,
            rng,
            rng_seed: config.seed,
            save_dir: config.save_dir,
        })
    }

    fn from_table(
        hyperparameters: Hyperparameters,
        q_table: QTable,
        seed: Option<u64>,
    ) -> Result<Self> {
        hyperparameters.validate()?;
        let field = FieldDiscretizer::new(hyperparameters.field_resolution)?;
        let discretizer = StateDiscretizer::new(field);

        let expected = TableShape::new(
            discretizer.own_space_size(),
            hyperparameters.action_space_size,
        )?;
        if q_table.shape() != expected {
            return Err(Error::ShapeMismatch {
                expected: expected.dims().to_vec(),
                found: q_table.shape().dims().to_vec(),
            });
        }

        Ok(Self {
            hyperparameters,
            discretizer,
            q_table,
            rng: build_rng(seed),
            rng_seed: seed,
            save_dir: None,
        })
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn shape(&self) -> TableShape {
        self.q_table.shape()
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn discretizer(&self) -> &StateDiscretizer<FieldDiscretizer> {
        &self.discretizer
    }

    pub fn save_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref()
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Copy of the current table for readers that must not block the writer.
    pub fn snapshot(&self) -> QTable {
        self.q_table.clone()
    }

    /// Discretize one observation.
    ///
    /// # Panics
    ///
    /// Panics on non-finite input, which would otherwise produce an index
    /// outside the table.
    pub fn get_state(
        &self,
        own_x: f64,
        own_y: f64,
        enemy_x: f64,
        enemy_y: f64,
        enemy_heading: f64,
        has_flag: bool,
    ) -> DiscreteState {
        self.discretize(&Observation {
            own: (own_x, own_y),
            opponent: (enemy_x, enemy_y),
            opponent_heading: enemy_heading,
            has_flag,
        })
    }

    pub fn discretize(&self, observation: &Observation) -> DiscreteState {
        self.discretizer.discretize(observation)
    }

    /// ε-greedy action selection; `None` always exploits.
    pub fn get_action(&mut self, state: DiscreteState, epsilon: Option<f64>) -> usize {
        self.q_table.select_action(state, epsilon, &mut self.rng)
    }

    /// Single-step Q-learning backup of `(state, action)` towards
    /// `reward + γ max_a' Q(next_state, a')`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn update_table(
        &mut self,
        state: DiscreteState,
        action: usize,
        reward: f64,
        next_state: DiscreteState,
    ) {
        let updated = self
            .q_table
            .q_learning_update(state, action, reward, next_state);
        debug!(
            state = %state,
            action,
            reward,
            next_state = %next_state,
            q = updated,
            "Q-learning update"
        );
    }

    /// Overwrite one Q-value. Used for terminal transitions, which have no
    /// next state to bootstrap from.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn set_qvalue(&mut self, state: DiscreteState, action: usize, value: f64) {
        self.q_table.set(state, action, value);
        debug!(state = %state, action, q = value, "set Q-value");
    }

    /// Save a checkpoint.
    ///
    /// `save_dir` falls back to the directory configured at construction;
    /// `name` falls back to the current UNIX time in seconds. The directory's
    /// config record is only written if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSaveDir`] when neither directory is given, and
    /// I/O or serialization errors from writing the files.
    pub fn save<S: AsRef<str>>(
        &self,
        attack_actions: &[S],
        retreat_actions: &[S],
        save_dir: Option<&Path>,
        name: Option<&str>,
    ) -> Result<SaveOutcome> {
        let dir = save_dir
            .or(self.save_dir.as_deref())
            .ok_or(Error::MissingSaveDir)?;
        let name = name.map_or_else(serialization::default_checkpoint_name, str::to_string);

        let config = CheckpointConfig::new(
            &self.hyperparameters,
            self.q_table.shape(),
            attack_actions,
            retreat_actions,
        );
        serialization::save_checkpoint(dir, &name, &config, &self.q_table)
    }

    /// Restore an engine from the weight blob at `path`; the config record is
    /// read from the same directory.
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedModel> {
        Self::load_inner(path.as_ref(), None)
    }

    /// Like [`QLearner::load`], with a seeded random source.
    pub fn load_with_seed(path: impl AsRef<Path>, seed: u64) -> Result<LoadedModel> {
        Self::load_inner(path.as_ref(), Some(seed))
    }

    fn load_inner(path: &Path, seed: Option<u64>) -> Result<LoadedModel> {
        let loaded = serialization::load_checkpoint(path)?;
        let hyperparameters = loaded.config.hyperparameters();
        let engine = Self::from_table(hyperparameters, loaded.table, seed)?;

        Ok(LoadedModel {
            engine,
            attack_actions: loaded.config.attack_actions,
            retreat_actions: loaded.config.retreat_actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seed: u64) -> QLearner {
        QLearner::new(
            EngineConfig::new()
                .with_learning_rate(0.5)
                .with_discount_factor(0.9)
                .with_action_space_size(4)
                .with_seed(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_shape_follows_field_and_actions() {
        let engine = engine(1);
        assert_eq!(engine.shape().dims(), [128, 5, 12, 2, 4]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = QLearner::new(EngineConfig::new().with_learning_rate(3.0)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_same_seed_same_table() {
        assert_eq!(engine(11).q_table(), engine(11).q_table());
        assert_ne!(engine(11).q_table(), engine(12).q_table());
    }

    #[test]
    fn test_get_state_uses_field_grid() {
        let engine = engine(1);
        let state = engine.get_state(-80.0, -40.0, -77.0, -36.0, 45.0, true);
        assert_eq!(state, DiscreteState::new(0, 0, 1, 1));
    }

    #[test]
    fn test_update_and_set() {
        let mut engine = engine(2);
        let state = DiscreteState::new(5, 1, 2, 0);
        let next = DiscreteState::new(6, 1, 2, 0);
        for action in 0..4 {
            engine.set_qvalue(next, action, 0.0);
        }
        engine.set_qvalue(state, 3, 0.0);

        engine.update_table(state, 3, 1.0, next);
        assert!((engine.q_table().get(state, 3) - 0.5).abs() < 1e-12);

        engine.set_qvalue(state, 3, 7.0);
        assert_eq!(engine.q_table().get(state, 3), 7.0);
    }

    #[test]
    fn test_save_without_directory_fails() {
        let engine = engine(3);
        let err = engine
            .save(&["a"], &["r"], None, Some("x"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingSaveDir));
    }

    #[test]
    fn test_from_table_rejects_foreign_shape() {
        let hyper = *engine(1).hyperparameters();
        let shape = TableShape::new(3, 4).unwrap();
        let table = QTable::from_values(shape, vec![0.0; shape.len()], 0.5, 0.9).unwrap();
        assert!(matches!(
            QLearner::from_table(hyper, table, None),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
