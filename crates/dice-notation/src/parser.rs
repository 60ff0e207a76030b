//! Parsing and compiling dice notation
//!
//! An expression is a signed sum of terms. Each term is an integer constant
//! or a dice term:
//!
//! ```text
//! [+|-] [count] d sides [k|d|kh|kl|dh|dl n] [adv|dis [repeats]]
//! ```
//!
//! `k`/`kh` keep the highest `n` dice, `kl` keeps the lowest, `d`/`dl` drop
//! the lowest and `dh` drops the highest. `adv`/`dis` take the best/worst
//! of `repeats` (default 2) independent rolls of the whole term.

use crate::error::{Error, Result};
use dice_core::{combine, die, Distribution, Face, Operand, DEFAULT_ADVANTAGE_DICE};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use tracing::{debug, trace};

lazy_static! {
    static ref CONSTANT: Regex = Regex::new(r"^[+-]?\d+$").unwrap();
    static ref DICE_TERM: Regex = Regex::new(
        r"(?i)^(?P<sign>[+-]?)(?P<count>\d*)d(?P<sides>\d+)(?:(?P<rule>kh|kl|dh|dl|k|d)(?P<n>\d+))?(?:(?P<bias>adv|dis)(?P<repeats>\d*))?$"
    )
    .unwrap();
}

/// Keep/drop rule applied to a pool of dice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    KeepHighest(usize),
    KeepLowest(usize),
    DropHighest(usize),
    DropLowest(usize),
}

/// Best/worst-of-N applied to a whole term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Advantage(usize),
    Disadvantage(usize),
}

/// A parsed dice term such as `-4d6kh3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notation {
    /// Whether the term is subtracted
    pub negative: bool,
    /// Number of dice in the pool
    pub count: usize,
    /// Sides per die
    pub sides: i64,
    /// Optional keep/drop rule
    pub selection: Option<Selection>,
    /// Optional advantage/disadvantage
    pub bias: Option<Bias>,
}

impl Notation {
    /// Build the exact distribution of this term
    pub fn compile(&self) -> Result<Distribution<Face>> {
        let mut dist = die(self.sides)?.repeat(self.count);

        dist = match self.selection {
            Some(Selection::KeepHighest(n)) => dist.keep_highest(n),
            Some(Selection::KeepLowest(n)) => dist.keep_lowest(n),
            Some(Selection::DropHighest(n)) => dist.drop_highest(n),
            Some(Selection::DropLowest(n)) => dist.drop_lowest(n),
            None => dist,
        };

        dist = match self.bias {
            Some(Bias::Advantage(n)) => dist.advantage(n),
            Some(Bias::Disadvantage(n)) => dist.disadvantage(n),
            None => dist,
        };

        if self.negative {
            dist = dist.map(Face::negate);
        }

        debug!(term = ?self, outcomes = dist.len(), "compiled dice term");
        Ok(dist)
    }
}

/// One signed term of an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// An integer constant
    Constant(i64),
    /// A dice term
    Dice(Notation),
}

impl Term {
    /// Largest absolute total the term can produce, if it fits in an `i64`
    pub fn magnitude(&self) -> Option<i64> {
        match self {
            Term::Constant(n) => n.checked_abs(),
            Term::Dice(notation) => i64::try_from(notation.count)
                .ok()?
                .checked_mul(notation.sides),
        }
    }

    /// Compile into an operand for the combination engine
    pub fn compile(&self) -> Result<Operand<Face>> {
        match self {
            Term::Constant(n) => Ok(Operand::Const(Face::Scalar(*n))),
            Term::Dice(notation) => Ok(Operand::Dist(notation.compile()?)),
        }
    }
}

impl FromStr for Term {
    type Err = Error;

    fn from_str(term: &str) -> Result<Self> {
        parse_term(term)
    }
}

/// Parse a single term (whitespace already removed)
pub fn parse_term(term: &str) -> Result<Term> {
    if CONSTANT.is_match(term) {
        let n = term.parse::<i64>().map_err(|_| Error::invalid_term(term))?;
        return Ok(Term::Constant(n));
    }

    let caps = DICE_TERM
        .captures(term)
        .ok_or_else(|| Error::invalid_term(term))?;
    let number = |name: &str| -> Result<Option<usize>> {
        match caps.name(name).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
            Some(digits) => digits
                .parse::<usize>()
                .map(Some)
                .map_err(|_| Error::invalid_term(term)),
            None => Ok(None),
        }
    };

    let negative = caps.name("sign").is_some_and(|m| m.as_str() == "-");
    let count = number("count")?.unwrap_or(1);
    let sides = caps["sides"]
        .parse::<i64>()
        .map_err(|_| Error::invalid_term(term))?;

    let selection = match (caps.name("rule"), number("n")?) {
        (Some(rule), Some(n)) => Some(match rule.as_str().to_ascii_lowercase().as_str() {
            "k" | "kh" => Selection::KeepHighest(n),
            "kl" => Selection::KeepLowest(n),
            "dh" => Selection::DropHighest(n),
            _ => Selection::DropLowest(n),
        }),
        _ => None,
    };

    let bias = match caps.name("bias") {
        Some(bias) => {
            let repeats = number("repeats")?.unwrap_or(DEFAULT_ADVANTAGE_DICE);
            if bias.as_str().eq_ignore_ascii_case("adv") {
                Some(Bias::Advantage(repeats))
            } else {
                Some(Bias::Disadvantage(repeats))
            }
        }
        None => None,
    };

    Ok(Term::Dice(Notation {
        negative,
        count,
        sides,
        selection,
        bias,
    }))
}

/// Split an expression into signed terms, breaking before each `+`/`-`
///
/// Whitespace is removed first.
pub fn split_terms(expression: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();

    for c in expression.chars().filter(|c| !c.is_whitespace()) {
        if (c == '+' || c == '-') && !current.is_empty() {
            terms.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        terms.push(current);
    }

    trace!(?terms, "split expression");
    terms
}

/// Parse and compile a full expression into one distribution
///
/// Each outcome holds one face per term, in term order; call
/// [`Distribution::sum`] for the distribution of totals. Expressions whose
/// totals could leave the `i64` range are rejected with
/// [`Error::OutOfRange`] naming the first term that crosses it.
pub fn parse(expression: &str) -> Result<Distribution<Face>> {
    let terms = split_terms(expression);
    if terms.is_empty() {
        return Err(Error::EmptyExpression);
    }

    let mut bound: i64 = 0;
    let mut parsed = Vec::with_capacity(terms.len());
    for text in &terms {
        let term = parse_term(text)?;
        bound = term
            .magnitude()
            .and_then(|m| bound.checked_add(m))
            .ok_or_else(|| Error::out_of_range(text))?;
        parsed.push(term);
    }

    let operands = parsed
        .iter()
        .map(Term::compile)
        .collect::<Result<Vec<_>>>()?;

    Ok(combine(&operands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_split_terms() {
        assert_eq!(split_terms(" 2d6 + 1d4 - 5 "), vec!["2d6", "+1d4", "-5"]);
        assert_eq!(split_terms("-1d8"), vec!["-1d8"]);
        assert!(split_terms("   ").is_empty());
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_term("-5").unwrap(), Term::Constant(-5));
        assert_eq!(parse_term("+12").unwrap(), Term::Constant(12));
    }

    #[test]
    fn test_parse_plain_dice() {
        let term: Term = "3d8".parse().unwrap();
        assert_eq!(
            term,
            Term::Dice(Notation {
                negative: false,
                count: 3,
                sides: 8,
                selection: None,
                bias: None,
            })
        );
    }

    #[test]
    fn test_parse_keep_drop_suffixes() {
        let rule = |s: &str| match parse_term(s).unwrap() {
            Term::Dice(n) => n.selection,
            Term::Constant(_) => None,
        };
        assert_eq!(rule("4d6k3"), Some(Selection::KeepHighest(3)));
        assert_eq!(rule("4d6kh3"), Some(Selection::KeepHighest(3)));
        assert_eq!(rule("4d6kl1"), Some(Selection::KeepLowest(1)));
        assert_eq!(rule("4d6d1"), Some(Selection::DropLowest(1)));
        assert_eq!(rule("4d6dl1"), Some(Selection::DropLowest(1)));
        assert_eq!(rule("4d6dh2"), Some(Selection::DropHighest(2)));
    }

    #[test]
    fn test_parse_advantage_suffixes() {
        let bias = |s: &str| match parse_term(s).unwrap() {
            Term::Dice(n) => n.bias,
            Term::Constant(_) => None,
        };
        assert_eq!(bias("1d20adv"), Some(Bias::Advantage(2)));
        assert_eq!(bias("1d20dis"), Some(Bias::Disadvantage(2)));
        assert_eq!(bias("1d20adv3"), Some(Bias::Advantage(3)));
        assert_eq!(bias("d20ADV"), Some(Bias::Advantage(2)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse("2d6+foo").unwrap_err(), Error::invalid_term("+foo"));
        assert_eq!(parse("").unwrap_err(), Error::EmptyExpression);
        assert!(matches!(parse("1d6x2"), Err(Error::InvalidTerm { .. })));
    }

    #[test]
    fn test_totals_beyond_i64_are_rejected() {
        assert_eq!(
            parse("9223372036854775807+1").unwrap_err(),
            Error::out_of_range("+1")
        );
        assert_eq!(
            parse("-9223372036854775808").unwrap_err(),
            Error::out_of_range("-9223372036854775808")
        );
        assert_eq!(
            parse("2d9223372036854775807").unwrap_err(),
            Error::out_of_range("2d9223372036854775807")
        );
        assert_eq!(
            parse("9223372036854775806+1").unwrap().sum().values().next(),
            Some(&Face::Scalar(i64::MAX))
        );
    }

    #[test]
    fn test_zero_sided_die_is_a_core_error() {
        assert_eq!(
            parse("1d0").unwrap_err(),
            Error::Core(dice_core::Error::InvalidSides { sides: 0 })
        );
    }

    #[test]
    fn test_negative_term_flips_faces() {
        let d = parse("-1d4").unwrap().sum();
        let totals: Vec<i64> = d.values().map(Face::total).collect();
        assert_eq!(totals, vec![-4, -3, -2, -1]);
    }

    #[test]
    fn test_keep_highest_expression() {
        let d = parse("4d6k3").unwrap().sum();
        assert_relative_eq!(d.average(), 15869.0 / 1296.0, epsilon = 1e-9);
    }

    #[test]
    fn test_advantage_expression() {
        let d = parse("1d20adv").unwrap().sum();
        assert_relative_eq!(d.weight_of(&Face::Scalar(20)), 39.0 / 400.0, epsilon = 1e-12);
    }
}
