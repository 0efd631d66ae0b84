//! Position discretizer port.
//!
//! The state discretizer delegates own-position bucketing to an implementation
//! of this trait. The crate ships [`crate::adapters::FieldDiscretizer`]; drivers
//! with a different field model can plug in their own.

/// Maps a continuous field position onto one of a fixed number of cells.
///
/// # Examples
///
/// ```
/// use aquaticus_qtable::ports::PositionDiscretizer;
///
/// struct Halves;
///
/// impl PositionDiscretizer for Halves {
///     fn to_discrete_idx(&self, x: f64, _y: f64) -> usize {
///         usize::from(x >= 0.0)
///     }
///
///     fn space_size(&self) -> usize {
///         2
///     }
/// }
///
/// assert_eq!(Halves.to_discrete_idx(-3.0, 0.0), 0);
/// ```
pub trait PositionDiscretizer {
    /// Cell index of `(x, y)`; must lie in `[0, space_size())`.
    fn to_discrete_idx(&self, x: f64, y: f64) -> usize;

    /// Total number of cells.
    fn space_size(&self) -> usize;
}

impl<D: PositionDiscretizer + ?Sized> PositionDiscretizer for &D {
    fn to_discrete_idx(&self, x: f64, y: f64) -> usize {
        (**self).to_discrete_idx(x, y)
    }

    fn space_size(&self) -> usize {
        (**self).space_size()
    }
}
