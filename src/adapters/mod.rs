//! Adapters implementing domain ports.

pub mod field_grid;

pub use field_grid::{FieldBounds, FieldDiscretizer};
