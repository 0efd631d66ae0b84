//! Continuous observation to discrete state mapping

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Point, distance},
    ports::PositionDiscretizer,
    types::{DISTANCE_BUCKETS, DiscreteState, FLAG_BUCKETS, HEADING_BUCKETS},
};

/// Upper (inclusive) distance bound of each bucket but the last, in metres.
pub const DISTANCE_THRESHOLDS: [f64; DISTANCE_BUCKETS - 1] = [5.0, 6.0, 7.0, 9.0];

/// Width of one heading bucket, in degrees.
pub const HEADING_BUCKET_DEGREES: f64 = 360.0 / HEADING_BUCKETS as f64;

/// One raw sensor reading from the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub own: Point,
    pub opponent: Point,
    /// Opponent heading in degrees, any real value
    pub opponent_heading: f64,
    pub has_flag: bool,
}

/// Bucket index of the distance to the opponent.
pub fn distance_bucket(distance: f64) -> usize {
    DISTANCE_THRESHOLDS
        .iter()
        .position(|&threshold| distance <= threshold)
        .unwrap_or(DISTANCE_BUCKETS - 1)
}

/// Bucket index of a heading in degrees, after wrapping into `[0, 360)`.
///
/// # Panics
///
/// Panics if `heading` is not finite.
pub fn heading_bucket(heading: f64) -> usize {
    assert!(heading.is_finite(), "opponent heading {heading} is not finite");
    let mut normalized = heading.rem_euclid(360.0);
    // tiny negative inputs round up to exactly 360
    if normalized >= 360.0 {
        normalized = 0.0;
    }
    (normalized / HEADING_BUCKET_DEGREES).floor() as usize
}

/// Maps observations to [`DiscreteState`]s.
///
/// Own position is bucketed by the wrapped [`PositionDiscretizer`]; distance,
/// heading and flag buckets are fixed.
#[derive(Debug, Clone)]
pub struct StateDiscretizer<D> {
    field: D,
}

impl<D: PositionDiscretizer> StateDiscretizer<D> {
    pub fn new(field: D) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &D {
        &self.field
    }

    /// Number of own-position cells.
    pub fn own_space_size(&self) -> usize {
        self.field.space_size()
    }

    /// # Panics
    ///
    /// Panics if a coordinate or the heading is not finite, or if the
    /// position discretizer returns an index outside its own space.
    pub fn discretize(&self, observation: &Observation) -> DiscreteState {
        let (own_x, own_y) = observation.own;
        assert!(
            own_x.is_finite() && own_y.is_finite(),
            "own position ({own_x}, {own_y}) is not finite"
        );
        let own_idx = self.field.to_discrete_idx(own_x, own_y);
        assert!(
            own_idx < self.field.space_size(),
            "own position index {own_idx} is out of bounds (must be < {})",
            self.field.space_size()
        );

        let (enemy_x, enemy_y) = observation.opponent;
        assert!(
            enemy_x.is_finite() && enemy_y.is_finite(),
            "opponent position ({enemy_x}, {enemy_y}) is not finite"
        );
        let distance_idx = distance_bucket(distance(observation.own, observation.opponent));
        assert!(distance_idx < DISTANCE_BUCKETS);

        let heading_idx = heading_bucket(observation.opponent_heading);
        assert!(
            heading_idx < HEADING_BUCKETS,
            "heading index {heading_idx} is out of bounds"
        );

        let flag_idx = usize::from(observation.has_flag);
        debug_assert!(flag_idx < FLAG_BUCKETS);

        DiscreteState::new(own_idx, distance_idx, heading_idx, flag_idx)
    }
}
