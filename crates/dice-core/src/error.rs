//! Error types for dice distribution operations
//!
//! Construction and iteration failures abort the operation with no partial
//! result. Every other operator is total over well-formed input.

use thiserror::Error;

/// Core error type for distribution operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A die was requested with fewer than one side
    #[error("Invalid side count: a die needs at least 1 side, got {sides}")]
    InvalidSides { sides: i64 },

    /// The reroll loop ran past its round cap
    #[error("Reroll overflow: still unresolved after {rounds} rounds (limit {limit}), map probably never terminates")]
    RerollOverflow { rounds: usize, limit: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check that a side count describes a real die
    pub fn check_sides(sides: i64) -> Result<()> {
        if sides < 1 {
            return Err(Error::InvalidSides { sides });
        }
        Ok(())
    }

    /// Check that a convergence threshold is usable
    pub fn check_threshold(threshold: f64) -> Result<()> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Reroll threshold {threshold} must be a non-negative number"
            )));
        }
        Ok(())
    }
}
