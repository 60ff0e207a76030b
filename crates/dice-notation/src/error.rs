//! Error types for dice notation parsing

use thiserror::Error;

/// Errors that can occur while parsing or compiling an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A term is neither an integer constant nor a dice term
    #[error("Cannot parse dice term {term:?}")]
    InvalidTerm { term: String },

    /// The expression's totals could exceed the `i64` range
    #[error("Dice term {term:?} pushes the expression total out of range")]
    OutOfRange { term: String },

    /// Nothing left to parse after stripping whitespace
    #[error("Empty dice expression")]
    EmptyExpression,

    /// A term parsed but could not be built (e.g. a zero-sided die)
    #[error("Core computation error: {0}")]
    Core(#[from] dice_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Error naming an unparseable term
    pub fn invalid_term(term: &str) -> Self {
        Self::InvalidTerm {
            term: term.to_string(),
        }
    }

    /// Error naming the term whose magnitude overflows the total
    pub fn out_of_range(term: &str) -> Self {
        Self::OutOfRange {
            term: term.to_string(),
        }
    }
}
