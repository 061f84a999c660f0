// error.rs - Error types for the life engine

use thiserror::Error;

/// Errors that can occur while building or advancing a simulation.
#[derive(Debug, Error)]
pub enum LifeError {
    /// Configuration rejected before any grid was built.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// A row task could not complete, so no generation was produced.
    #[error("row task {row} failed: {reason}")]
    TaskFailure {
        /// Row index the failed task was computing.
        row: usize,
        /// Panic message or cancellation reason.
        reason: String,
    },

    /// The worker pool could not be started.
    #[error("worker runtime unavailable: {0}")]
    RuntimeUnavailable(#[from] std::io::Error),

    /// A replacement grid does not match the simulation's dimensions.
    #[error("grid dimensions {got:?} do not match {expected:?}")]
    DimensionMismatch {
        /// Dimensions of the owned grid.
        expected: (usize, usize),
        /// Dimensions of the rejected grid.
        got: (usize, usize),
    },

    /// The simulation stopped after an earlier fatal failure.
    #[error("simulation halted after a fatal failure")]
    Halted,

    /// A textual pattern could not be parsed.
    #[error("invalid pattern at line {line}, column {column}: unexpected {found:?}")]
    InvalidPattern {
        /// 1-based line of the offending character.
        line: usize,
        /// 1-based column of the offending character.
        column: usize,
        /// The character that was not understood.
        found: char,
    },
}

impl LifeError {
    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Whether the error leaves the simulation unable to continue.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::TaskFailure { .. } | Self::RuntimeUnavailable(_) | Self::Halted
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, LifeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = LifeError::invalid_config("width must be positive");
        assert_eq!(err.to_string(), "invalid configuration: width must be positive");

        let err = LifeError::TaskFailure {
            row: 7,
            reason: "cancelled".into(),
        };
        assert_eq!(err.to_string(), "row task 7 failed: cancelled");
    }

    #[test]
    fn test_fatality() {
        assert!(!LifeError::invalid_config("x").is_fatal());
        assert!(LifeError::Halted.is_fatal());
        assert!(
            LifeError::TaskFailure {
                row: 0,
                reason: String::new()
            }
            .is_fatal()
        );
    }
}
