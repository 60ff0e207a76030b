//! Cross-product combination of independent distributions
//!
//! Combining is exact and eager: `V` variable inputs with `n₁..n_V` outcomes
//! produce `∏nᵢ` outcomes. Constant operands are held fixed at their position
//! and never multiply the expansion.

use crate::distribution::{Distribution, Operand, Outcome};
use crate::face::{die, Face};
use crate::error::Result;
use tracing::trace;

/// Cartesian product of independent operands
///
/// Each output value lists one value per operand, in operand order, and its
/// weight is the product of the contributing weights. An empty operand list
/// yields a single empty tuple with weight 1.
pub fn product<T: Clone>(items: &[Operand<T>]) -> Distribution<Vec<T>> {
    let mut partial = vec![Outcome::new(Vec::with_capacity(items.len()), 1.0)];

    for item in items {
        match item {
            Operand::Const(value) => {
                for outcome in &mut partial {
                    outcome.value.push(value.clone());
                }
            }
            Operand::Dist(dist) => {
                let mut next = Vec::with_capacity(partial.len() * dist.len());
                for prefix in &partial {
                    for outcome in dist.iter() {
                        let mut value = prefix.value.clone();
                        value.push(outcome.value.clone());
                        next.push(Outcome::new(value, prefix.weight * outcome.weight));
                    }
                }
                partial = next;
            }
        }
    }

    trace!(operands = items.len(), outcomes = partial.len(), "expanded product");
    Distribution::from_outcomes(partial)
}

/// Cross product of face operands, each outcome a [`Face::Seq`]
pub fn combine(items: &[Operand<Face>]) -> Distribution<Face> {
    product(items).into_map(Face::Seq)
}

/// `count` independent copies of a `sides`-sided die
pub fn dice(count: usize, sides: i64) -> Result<Distribution<Face>> {
    Ok(die(sides)?.repeat(count))
}

impl Distribution<Face> {
    /// Combine `n` independent copies of this distribution
    pub fn repeat(&self, n: usize) -> Distribution<Face> {
        let copies = vec![Operand::Dist(self.clone()); n];
        combine(&copies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_product_size_and_mass() {
        let a = Distribution::from_pairs(vec![(1, 0.5), (2, 1.5)]);
        let b = Distribution::from_pairs(vec![(10, 1.0), (20, 1.0), (30, 2.0)]);
        let p = product(&[Operand::Dist(a.clone()), Operand::Dist(b.clone())]);
        assert_eq!(p.len(), 6);
        assert_relative_eq!(p.total_weight(), a.total_weight() * b.total_weight());
        assert_eq!(p.outcomes()[0].value, vec![1, 10]);
        assert_eq!(p.outcomes()[5].value, vec![2, 30]);
    }

    #[test]
    fn test_constants_do_not_expand() {
        let d = Distribution::uniform(vec![1, 2, 3]);
        let p = product(&[Operand::Const(0), Operand::Dist(d), Operand::Const(9)]);
        assert_eq!(p.len(), 3);
        for outcome in p.iter() {
            assert_eq!(outcome.value.len(), 3);
            assert_eq!(outcome.value[0], 0);
            assert_eq!(outcome.value[2], 9);
        }
    }

    #[test]
    fn test_empty_product_is_unit() {
        let p = product::<i64>(&[]);
        assert_eq!(p.outcomes(), &[Outcome::new(vec![], 1.0)]);
    }

    #[test]
    fn test_repeat_wraps_in_sequences() {
        let two_d6 = dice(2, 6).unwrap();
        assert_eq!(two_d6.len(), 36);
        assert_eq!(
            two_d6.outcomes()[0].value,
            Face::Seq(vec![Face::Scalar(1), Face::Scalar(1)])
        );
        assert_relative_eq!(two_d6.average(), 7.0, epsilon = 1e-12);
    }
}
