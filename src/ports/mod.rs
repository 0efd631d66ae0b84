//! Ports (trait boundaries) for external collaborators.
//!
//! The engine owns these traits; concrete implementations live in
//! [`crate::adapters`].

pub mod discretizer;

pub use discretizer::PositionDiscretizer;
