//! Exact dice probability toolkit
//!
//! This crate re-exports the dice workspace under one import path:
//!
//! - [`dice_core`]: distributions, combination, bucketing, order
//!   statistics, the reroll engine, exploding dice and sampling
//! - [`dice_notation`]: parsing expressions like `4d6k3+2` into distributions
//!
//! # Examples
//!
//! ```rust
//! use dice_stats::{parse, Face, Step, Reroll};
//!
//! # fn main() -> dice_stats::Result<()> {
//! // Great weapon fighting: reroll 1s and 2s once on 2d6
//! let d6 = dice_stats::die(6)?;
//! let gwf = Reroll::new(|face: &Face, round| {
//!     if face.total() <= 2 && round == 1 {
//!         Step::Continue(d6.clone())
//!     } else {
//!         Step::Terminal(face.clone())
//!     }
//! })
//! .run(&d6)?
//! .repeat(2)
//! .sum();
//!
//! let plain = parse("2d6")?.sum();
//! assert!(gwf.average() > plain.average());
//! # Ok(())
//! # }
//! ```

pub use dice_core::{
    combine, dice, die, product, reroll, Distribution, ExplodeOptions, ExplodeSummary,
    ExplodeThreshold, Face, GroupKey, Operand, Outcome, Pending, Ranking, Reroll, RerollConfig,
    Step, DEFAULT_ADVANTAGE_DICE, DEFAULT_ROLL_MAX, DEFAULT_THRESHOLD,
};
pub use dice_notation::{parse, parse_term, Bias, Notation, Selection, Term};

pub use dice_core;
pub use dice_notation;

use thiserror::Error;

/// Error type covering every crate in the workspace
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Distribution construction or reroll failure
    #[error(transparent)]
    Core(#[from] dice_core::Error),

    /// Notation parse failure
    #[error(transparent)]
    Notation(#[from] dice_notation::Error),
}

/// Result type alias using the workspace Error
pub type Result<T> = std::result::Result<T, Error>;
