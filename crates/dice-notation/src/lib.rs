//! Dice notation for exact distributions
//!
//! Parses expressions such as `2d6+1d4-5`, `4d6k3` or `1d20adv` and
//! compiles them into [`dice_core::Distribution`] values through the
//! combination and order-statistic engines.
//!
//! # Examples
//!
//! ```rust
//! use dice_core::Face;
//! use dice_notation::parse;
//!
//! let attack = parse("1d20adv + 5").unwrap().sum();
//! let hit_chance = attack.probability(|face| face.total() >= 15);
//! println!("hits AC 15 with probability {hit_chance:.3}");
//!
//! let stats = parse("4d6k3").unwrap().sum();
//! assert_eq!(stats.values().next(), Some(&Face::Scalar(3)));
//! ```

pub mod error;
pub mod parser;

pub use error::{Error, Result};
pub use parser::{parse, parse_term, split_terms, Bias, Notation, Selection, Term};
