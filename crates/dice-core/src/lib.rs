//! Exact probability distributions for dice mechanics
//!
//! This crate computes exact (non-simulated) distributions over the outcomes
//! of dice rolls, and supports composing, filtering and iteratively
//! re-resolving them to answer questions about tabletop-game mechanics
//! without Monte Carlo approximation.
//!
//! # Overview
//!
//! | Component | Entry points |
//! |-----------|--------------|
//! | Distribution core | [`Distribution::point`], [`Distribution::from_pairs`], [`Distribution::uniform`], [`die`], `map`, `join`, `flat_map`, `normalize` |
//! | Combination | [`combine`], [`product`], [`dice`], [`Distribution::repeat`] |
//! | Grouping | `bucket`, `bucket_by_key`, `bucket_with`, `sum`, `count`, `replace` |
//! | Order statistics | `keep_highest`, `keep_lowest`, `drop_highest`, `drop_lowest`, `advantage`, `disadvantage` |
//! | Reroll engine | [`Reroll`], [`reroll`], [`Step`] |
//! | Explode | `explode`, `explode_with` |
//! | Sampling | `sample`, `roll`, `roll_n` |
//!
//! Weights are `f64` and never renormalized implicitly. Degenerate input
//! (an empty uniform distribution, normalizing zero mass) propagates as NaN
//! or empty results rather than errors.
//!
//! # Examples
//!
//! ## Three dice summed
//!
//! ```rust
//! use dice_core::{dice, Face};
//!
//! let three_d6 = dice(3, 6).unwrap().sum();
//! let p10 = three_d6.weight_of(&Face::Scalar(10));
//! assert!((p10 - 27.0 / 216.0).abs() < 1e-12);
//! ```
//!
//! ## Advantage on a d20
//!
//! ```rust
//! use dice_core::die;
//!
//! let adv = die(20).unwrap().advantage(2);
//! println!("average with advantage: {:.3}", adv.average());
//! ```
//!
//! ## Exploding dice
//!
//! ```rust
//! use dice_core::{die, ExplodeOptions};
//!
//! let d6 = die(6).unwrap();
//! let once = d6.explode_with(ExplodeOptions::new().times(1)).unwrap();
//! assert!(once.average() > d6.average());
//! ```

pub mod bucket;
pub mod combine;
pub mod distribution;
pub mod error;
pub mod explode;
pub mod face;
pub mod order;
pub mod reroll;
pub mod sample;

// Re-export main types and functions
pub use bucket::GroupKey;
pub use combine::{combine, dice, product};
pub use distribution::{Distribution, Operand, Outcome};
pub use error::{Error, Result};
pub use explode::{ExplodeOptions, ExplodeSummary, ExplodeThreshold};
pub use face::{die, Face};
pub use order::{Ranking, DEFAULT_ADVANTAGE_DICE};
pub use reroll::{reroll, Pending, Reroll, RerollConfig, Step, DEFAULT_ROLL_MAX, DEFAULT_THRESHOLD};
