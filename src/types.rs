//! Discrete state tuple and table shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of distance buckets to the opponent.
pub const DISTANCE_BUCKETS: usize = 5;

/// Number of 30° buckets for the opponent heading.
pub const HEADING_BUCKETS: usize = 12;

/// Flag held / not held.
pub const FLAG_BUCKETS: usize = 2;

/// Number of dimensions of a Q-table (four state axes plus the action axis).
pub const TABLE_RANK: usize = 5;

/// Discretized observation addressing one row of the Q-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscreteState {
    pub own_idx: usize,
    pub distance_idx: usize,
    pub heading_idx: usize,
    pub flag_idx: usize,
}

impl DiscreteState {
    pub const fn new(
        own_idx: usize,
        distance_idx: usize,
        heading_idx: usize,
        flag_idx: usize,
    ) -> Self {
        Self {
            own_idx,
            distance_idx,
            heading_idx,
            flag_idx,
        }
    }

    /// Whether the agent holds the flag in this state.
    pub fn has_flag(&self) -> bool {
        self.flag_idx == 1
    }
}

impl fmt::Display for DiscreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.own_idx, self.distance_idx, self.heading_idx, self.flag_idx
        )
    }
}

/// Shape of a Q-table: `[own_space, distance, heading, flag, action]`.
///
/// Values are laid out row-major with the action axis varying fastest, so
/// one state's action values are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableShape {
    own_space_size: usize,
    action_space_size: usize,
    len: usize,
}

impl TableShape {
    /// Create a shape for a field with `own_space_size` cells and
    /// `action_space_size` actions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either size is zero or the
    /// total number of Q-values does not fit in a `usize`.
    pub fn new(own_space_size: usize, action_space_size: usize) -> Result<Self> {
        if own_space_size == 0 {
            return Err(Error::invalid_config("own position space must not be empty"));
        }
        if action_space_size == 0 {
            return Err(Error::invalid_config("action space must not be empty"));
        }
        let len = [DISTANCE_BUCKETS, HEADING_BUCKETS, FLAG_BUCKETS, action_space_size]
            .into_iter()
            .try_fold(own_space_size, usize::checked_mul)
            .ok_or_else(|| {
                Error::invalid_config(format!(
                    "table of {own_space_size} cells x {action_space_size} actions is too large"
                ))
            })?;
        Ok(Self {
            own_space_size,
            action_space_size,
            len,
        })
    }

    /// Rebuild a shape from its persisted dimension list.
    ///
    /// The three fixed axes must match the engine's bucket counts.
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        match *dims {
            [own, DISTANCE_BUCKETS, HEADING_BUCKETS, FLAG_BUCKETS, actions] => {
                Self::new(own, actions)
            }
            _ => Err(Error::ShapeMismatch {
                expected: vec![0, DISTANCE_BUCKETS, HEADING_BUCKETS, FLAG_BUCKETS, 0],
                found: dims.to_vec(),
            }),
        }
    }

    pub fn own_space_size(&self) -> usize {
        self.own_space_size
    }

    pub fn action_space_size(&self) -> usize {
        self.action_space_size
    }

    pub fn dims(&self) -> [usize; TABLE_RANK] {
        [
            self.own_space_size,
            DISTANCE_BUCKETS,
            HEADING_BUCKETS,
            FLAG_BUCKETS,
            self.action_space_size,
        ]
    }

    /// Total number of Q-values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: both variable axes are non-zero by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Validate every component of `state` against its bound.
    pub fn check(&self, state: DiscreteState) -> Result<()> {
        let axes = [
            ("own position", state.own_idx, self.own_space_size),
            ("distance", state.distance_idx, DISTANCE_BUCKETS),
            ("heading", state.heading_idx, HEADING_BUCKETS),
            ("flag", state.flag_idx, FLAG_BUCKETS),
        ];
        for (dimension, index, bound) in axes {
            if index >= bound {
                return Err(Error::StateOutOfBounds {
                    dimension,
                    index,
                    bound,
                });
            }
        }
        Ok(())
    }

    pub fn check_action(&self, action: usize) -> Result<()> {
        if action < self.action_space_size {
            Ok(())
        } else {
            Err(Error::ActionOutOfBounds {
                action,
                bound: self.action_space_size,
            })
        }
    }

    /// Flat offset of the first action value of `state`.
    ///
    /// Callers must have validated `state`.
    pub(crate) fn row_start(&self, state: DiscreteState) -> usize {
        let cell = ((state.own_idx * DISTANCE_BUCKETS + state.distance_idx) * HEADING_BUCKETS
            + state.heading_idx)
            * FLAG_BUCKETS
            + state.flag_idx;
        cell * self.action_space_size
    }
}
