//! Dense Q-table over the discretized state space

use rand::{
    Rng,
    distr::{Distribution, Uniform},
};

use crate::{
    Error, Result,
    config::InitRange,
    types::{DiscreteState, TableShape},
};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Stored as one flat `Vec<f64>` in row-major order over
/// `(own, distance, heading, flag, action)`. The shape never changes after
/// construction; only the values do.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    shape: TableShape,
    values: Vec<f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a table whose every entry is drawn independently from
    /// `init_range`.
    pub fn random<R: Rng + ?Sized>(
        shape: TableShape,
        learning_rate: f64,
        discount_factor: f64,
        init_range: InitRange,
        rng: &mut R,
    ) -> Result<Self> {
        init_range.validate()?;
        let dist = Uniform::new(init_range.low, init_range.high)
            .map_err(|e| Error::invalid_config(format!("initial value range: {e}")))?;
        let values = dist.sample_iter(rng).take(shape.len()).collect();

        Ok(Self {
            shape,
            values,
            learning_rate,
            discount_factor,
        })
    }

    /// Create a table from existing values, e.g. a loaded weight blob.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlobLength`] if `values` does not hold exactly one
    /// entry per cell of `shape`.
    pub fn from_values(
        shape: TableShape,
        values: Vec<f64>,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Result<Self> {
        if values.len() != shape.len() {
            return Err(Error::BlobLength {
                shape: shape.dims().to_vec(),
                expected: shape.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            shape,
            values,
            learning_rate,
            discount_factor,
        })
    }

    pub fn shape(&self) -> TableShape {
        self.shape
    }

    /// All Q-values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn action_space_size(&self) -> usize {
        self.shape.action_space_size()
    }

    /// Flat index of `(state, action)`.
    ///
    /// # Panics
    ///
    /// Panics if any index is outside its bound.
    pub fn offset(&self, state: DiscreteState, action: usize) -> usize {
        self.checked_row_start(state) + self.checked_action(action)
    }

    /// Action values of `state`, indexed by action.
    ///
    /// # Panics
    ///
    /// Panics if `state` is outside the table.
    pub fn row(&self, state: DiscreteState) -> &[f64] {
        let start = self.checked_row_start(state);
        &self.values[start..start + self.shape.action_space_size()]
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: DiscreteState, action: usize) -> f64 {
        self.values[self.offset(state, action)]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: DiscreteState, action: usize, value: f64) {
        let offset = self.offset(state, action);
        self.values[offset] = value;
    }

    /// Get maximum Q-value over all actions in a state
    pub fn max_q(&self, state: DiscreteState) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value); ties go to the lowest index
    pub fn greedy_action(&self, state: DiscreteState) -> usize {
        let row = self.row(state);
        let mut best = 0;
        for (action, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = action;
            }
        }
        best
    }

    /// Epsilon-greedy action selection.
    ///
    /// With `Some(epsilon)` (clamped to `[0, 1]`) a uniformly random action is
    /// returned with that probability; otherwise, and for `None`, the greedy
    /// action. A NaN epsilon counts as 0.
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        state: DiscreteState,
        epsilon: Option<f64>,
        rng: &mut R,
    ) -> usize {
        if let Some(epsilon) = epsilon {
            let epsilon = if epsilon.is_nan() {
                0.0
            } else {
                epsilon.clamp(0.0, 1.0)
            };
            if rng.random::<f64>() < epsilon {
                // Explore: random action
                return rng.random_range(0..self.shape.action_space_size());
            }
        }
        self.greedy_action(state)
    }

    /// Q-learning update: single-step tabular backup
    ///
    /// Q(s,a) ← (1 - α) Q(s,a) + α [r + γ max_a' Q(s',a')]
    ///
    /// Returns the value written.
    ///
    /// # Panics
    ///
    /// Panics if `state`, `action` or `next_state` is out of bounds.
    pub fn q_learning_update(
        &mut self,
        state: DiscreteState,
        action: usize,
        reward: f64,
        next_state: DiscreteState,
    ) -> f64 {
        let expected_future_q = self.max_q(next_state);
        let offset = self.offset(state, action);
        let existing_q = self.values[offset];

        let updated_q = (1.0 - self.learning_rate) * existing_q
            + self.learning_rate * (reward + self.discount_factor * expected_future_q);
        self.values[offset] = updated_q;
        updated_q
    }

    fn checked_row_start(&self, state: DiscreteState) -> usize {
        if let Err(e) = self.shape.check(state) {
            panic!("invalid Q-table state {state}: {e}");
        }
        self.shape.row_start(state)
    }

    fn checked_action(&self, action: usize) -> usize {
        if let Err(e) = self.shape.check_action(action) {
            panic!("invalid Q-table action: {e}");
        }
        action
    }
}
