//! Rectangular grid discretizer for the playing field.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, ports::PositionDiscretizer};

/// Axis-aligned bounds of the playing field, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl FieldBounds {
    /// The 160 m x 80 m capture-the-flag field, centred on the origin.
    pub const AQUATICUS: FieldBounds = FieldBounds {
        min_x: -80.0,
        max_x: 80.0,
        min_y: -40.0,
        max_y: 40.0,
    };

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self::AQUATICUS
    }
}

/// Square-cell grid over [`FieldBounds`].
///
/// Cells are `resolution` metres wide and numbered row by row from the
/// `(min_x, min_y)` corner. Positions outside the field map to the nearest
/// edge cell, so every index lies in `[0, space_size)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiscretizer {
    bounds: FieldBounds,
    resolution: usize,
    columns: usize,
    rows: usize,
}

impl FieldDiscretizer {
    /// Grid over the default field with `resolution`-metre cells.
    pub fn new(resolution: usize) -> Result<Self> {
        Self::with_bounds(FieldBounds::default(), resolution)
    }

    pub fn with_bounds(bounds: FieldBounds, resolution: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(Error::invalid_config("field resolution must be positive"));
        }
        let finite = [bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(Error::invalid_config(format!(
                "field bounds {bounds:?} must be finite with positive extent"
            )));
        }

        let step = resolution as f64;
        let columns = (bounds.width() / step).ceil() as usize;
        let rows = (bounds.height() / step).ceil() as usize;

        Ok(Self {
            bounds,
            resolution,
            columns,
            rows,
        })
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn axis_cell(value: f64, min: f64, step: f64, cells: usize) -> usize {
        let cell = ((value - min) / step).floor();
        if cell <= 0.0 {
            0
        } else {
            (cell as usize).min(cells - 1)
        }
    }
}

impl PositionDiscretizer for FieldDiscretizer {
    /// # Panics
    ///
    /// Panics if either coordinate is not finite.
    fn to_discrete_idx(&self, x: f64, y: f64) -> usize {
        assert!(
            x.is_finite() && y.is_finite(),
            "position ({x}, {y}) is not finite"
        );
        let step = self.resolution as f64;
        let column = Self::axis_cell(x, self.bounds.min_x, step, self.columns);
        let row = Self::axis_cell(y, self.bounds.min_y, step, self.rows);
        row * self.columns + column
    }

    fn space_size(&self) -> usize {
        self.columns * self.rows
    }
}
