//! Error types for the Q-table engine

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the engine
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("model cannot save without a save directory")]
    MissingSaveDir,

    #[error("missing {kind} file at {}", .path.display())]
    MissingCheckpointFile { kind: &'static str, path: PathBuf },

    #[error("malformed config record at {}: {source}", .path.display())]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported config format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("table shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("weight blob holds {got} values but shape {shape:?} needs {expected}")]
    BlobLength {
        shape: Vec<usize>,
        expected: usize,
        got: usize,
    },

    #[error("{dimension} index {index} is out of bounds (must be < {bound})")]
    StateOutOfBounds {
        dimension: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("action {action} is out of bounds (action space size is {bound})")]
    ActionOutOfBounds { action: usize, bound: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },
}

impl Error {
    /// True for errors caused by a missing or inconsistent configuration or
    /// checkpoint, as opposed to storage failures or invariant violations.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidConfiguration { .. }
                | Error::MissingSaveDir
                | Error::MissingCheckpointFile { .. }
                | Error::MalformedConfig { .. }
                | Error::UnsupportedVersion { .. }
                | Error::ShapeMismatch { .. }
                | Error::BlobLength { .. }
        )
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(Error::MissingSaveDir.is_configuration());
        assert!(
            Error::ShapeMismatch {
                expected: vec![1, 5, 12, 2, 3],
                found: vec![1, 5, 12, 2, 4],
            }
            .is_configuration()
        );
        assert!(
            !Error::StateOutOfBounds {
                dimension: "heading",
                index: 12,
                bound: 12,
            }
            .is_configuration()
        );
        let io = Error::from(std::io::Error::other("disk full"));
        assert!(!io.is_configuration());
    }

    #[test]
    fn test_out_of_bounds_message_names_dimension() {
        let err = Error::StateOutOfBounds {
            dimension: "distance",
            index: 5,
            bound: 5,
        };
        assert_eq!(
            err.to_string(),
            "distance index 5 is out of bounds (must be < 5)"
        );
    }
}
