//! Die faces and single-die constructors

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of one die, or of a combined group of dice
///
/// Sequences nest arbitrarily (keeping the highest of several combined
/// groups yields a sequence of sequences). Aggregates such as
/// [`Face::total`] walk the whole tree; flattening is always explicit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Face {
    /// A single numeric result
    Scalar(i64),
    /// An ordered group of faces
    Seq(Vec<Face>),
}

impl Face {
    /// Recursive numeric sum of every scalar in the face
    ///
    /// Saturates at the `i64` bounds; see [`Face::checked_total`].
    pub fn total(&self) -> i64 {
        match self {
            Face::Scalar(n) => *n,
            Face::Seq(faces) => faces
                .iter()
                .fold(0_i64, |acc, face| acc.saturating_add(face.total())),
        }
    }

    /// Recursive sum, or `None` if it does not fit in an `i64`
    pub fn checked_total(&self) -> Option<i64> {
        match self {
            Face::Scalar(n) => Some(*n),
            Face::Seq(faces) => faces
                .iter()
                .try_fold(0_i64, |acc, face| acc.checked_add(face.checked_total()?)),
        }
    }

    /// All scalars in depth-first order
    pub fn flatten(&self) -> Vec<i64> {
        let mut out = Vec::new();
        self.collect_scalars(&mut out);
        out
    }

    fn collect_scalars(&self, out: &mut Vec<i64>) {
        match self {
            Face::Scalar(n) => out.push(*n),
            Face::Seq(faces) => faces.iter().for_each(|f| f.collect_scalars(out)),
        }
    }

    /// The top-level faces; a scalar is a group of one
    pub fn faces(&self) -> &[Face] {
        match self {
            Face::Scalar(_) => std::slice::from_ref(self),
            Face::Seq(faces) => faces,
        }
    }

    /// The scalar value, if this face is not a sequence
    pub fn as_scalar(&self) -> Option<i64> {
        match self {
            Face::Scalar(n) => Some(*n),
            Face::Seq(_) => None,
        }
    }

    /// Apply `f` to every scalar, keeping the nesting shape
    pub fn map_scalars<F>(&self, f: &F) -> Face
    where
        F: Fn(i64) -> i64,
    {
        match self {
            Face::Scalar(n) => Face::Scalar(f(*n)),
            Face::Seq(faces) => Face::Seq(faces.iter().map(|face| face.map_scalars(f)).collect()),
        }
    }

    /// Flip the sign of every scalar (`i64::MIN` saturates)
    pub fn negate(&self) -> Face {
        self.map_scalars(&i64::saturating_neg)
    }
}

impl From<i64> for Face {
    fn from(n: i64) -> Self {
        Face::Scalar(n)
    }
}

impl From<Vec<Face>> for Face {
    fn from(faces: Vec<Face>) -> Self {
        Face::Seq(faces)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Scalar(n) => write!(f, "{n}"),
            Face::Seq(faces) => {
                write!(f, "[")?;
                for (i, face) in faces.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{face}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Uniform distribution over `1..=sides`
pub fn die(sides: i64) -> Result<Distribution<Face>> {
    Error::check_sides(sides)?;
    Ok(Distribution::uniform((1..=sides).map(Face::Scalar)))
}

impl Distribution<Face> {
    /// See [`die`]
    pub fn die(sides: i64) -> Result<Self> {
        die(sides)
    }

    /// Expected total of the faces
    pub fn average(&self) -> f64 {
        self.average_by(|face| face.total() as f64)
    }

    /// Smallest possible total; positive infinity when empty
    pub fn min(&self) -> f64 {
        self.min_by(|face| face.total() as f64)
    }

    /// Largest possible total; negative infinity when empty
    pub fn max(&self) -> f64 {
        self.max_by(|face| face.total() as f64)
    }
}
