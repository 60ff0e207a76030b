//! Weighted-outcome distributions and their functor/monad operators
//!
//! A [`Distribution`] is an ordered list of `(value, weight)` pairs. Values
//! may repeat until the distribution is bucketed, and weights are never
//! rescaled unless [`Distribution::normalize`] is called explicitly.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One `(value, weight)` pair of a distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// The outcome value
    pub value: T,
    /// Probability mass carried by this outcome (not necessarily normalized)
    pub weight: f64,
}

impl<T> Outcome<T> {
    /// Create a new outcome
    pub fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.6}", self.value, self.weight)
    }
}

/// Either a plain value or a nested distribution of values
///
/// This is the explicit form of "a value that might itself be a
/// distribution": [`Distribution::join`] flattens `Dist` entries into their
/// parent and passes `Const` entries through, and the combination engine
/// holds `Const` entries fixed while expanding `Dist` entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<T> {
    /// A fixed value (a one-outcome distribution with weight 1)
    Const(T),
    /// A distribution of values
    Dist(Distribution<T>),
}

impl<T> From<Distribution<T>> for Operand<T> {
    fn from(dist: Distribution<T>) -> Self {
        Operand::Dist(dist)
    }
}

/// A discrete probability distribution over values of type `T`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution<T> {
    results: Vec<Outcome<T>>,
}

impl<T> Default for Distribution<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

impl<T> Distribution<T> {
    /// A single outcome with weight 1
    pub fn point(value: T) -> Self {
        Self {
            results: vec![Outcome::new(value, 1.0)],
        }
    }

    /// Wrap the given pairs verbatim; the caller owns the weight semantics
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        pairs
            .into_iter()
            .map(|(value, weight)| Outcome::new(value, weight))
            .collect()
    }

    /// Wrap already-built outcomes
    pub fn from_outcomes(results: Vec<Outcome<T>>) -> Self {
        Self { results }
    }

    /// Uniform distribution giving each supplied value weight `1 / n`
    ///
    /// An empty input yields an empty distribution.
    pub fn uniform<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        let weight = 1.0 / values.len() as f64;
        values
            .into_iter()
            .map(|value| Outcome::new(value, weight))
            .collect()
    }

    /// The outcomes in order
    pub fn outcomes(&self) -> &[Outcome<T>] {
        &self.results
    }

    /// Consume the distribution, returning its outcomes
    pub fn into_outcomes(self) -> Vec<Outcome<T>> {
        self.results
    }

    /// Iterate over the outcomes
    pub fn iter(&self) -> std::slice::Iter<'_, Outcome<T>> {
        self.results.iter()
    }

    /// Iterate over the outcome values
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.results.iter().map(|o| &o.value)
    }

    /// Number of outcomes (not necessarily distinct)
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the distribution has no outcomes
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.results.iter().map(|o| o.weight).sum()
    }

    /// Functor map: replace each value with `f(value)`, keeping its weight
    ///
    /// The result may contain duplicate values; bucket it to consolidate.
    pub fn map<U, F>(&self, mut f: F) -> Distribution<U>
    where
        F: FnMut(&T) -> U,
    {
        self.results
            .iter()
            .map(|o| Outcome::new(f(&o.value), o.weight))
            .collect()
    }

    /// Like [`map`](Self::map), but consumes the distribution
    pub fn into_map<U, F>(self, mut f: F) -> Distribution<U>
    where
        F: FnMut(T) -> U,
    {
        self.results
            .into_iter()
            .map(|o| Outcome::new(f(o.value), o.weight))
            .collect()
    }

    /// `join(map(f))`
    pub fn flat_map<U, F>(&self, f: F) -> Distribution<U>
    where
        F: FnMut(&T) -> Operand<U>,
    {
        self.map(f).join()
    }

    /// Rescale weights in place so they sum to 1
    ///
    /// A zero total produces NaN weights; that case is not guarded.
    pub fn normalize(&mut self) -> &mut Self {
        let total = self.total_weight();
        for outcome in &mut self.results {
            outcome.weight /= total;
        }
        self
    }

    /// Stable in-place sort by a derived key
    pub fn sort_by_key<K, F>(&mut self, mut key: F) -> &mut Self
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.results.sort_by_key(|o| key(&o.value));
        self
    }

    /// Stable in-place sort with a comparator over values
    pub fn sort_by<F>(&mut self, mut compare: F) -> &mut Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.results.sort_by(|a, b| compare(&a.value, &b.value));
        self
    }

    /// Weighted mean of `f(value)`, relative to the total weight
    pub fn average_by<F>(&self, mut f: F) -> f64
    where
        F: FnMut(&T) -> f64,
    {
        let weighted: f64 = self.results.iter().map(|o| f(&o.value) * o.weight).sum();
        weighted / self.total_weight()
    }

    /// Weighted variance of `f(value)`, relative to the total weight
    pub fn variance_by<F>(&self, mut f: F) -> f64
    where
        F: FnMut(&T) -> f64,
    {
        let total = self.total_weight();
        let points: Vec<(f64, f64)> = self.results.iter().map(|o| (f(&o.value), o.weight)).collect();
        let mean = points.iter().map(|(x, w)| x * w).sum::<f64>() / total;
        points.iter().map(|(x, w)| (x - mean).powi(2) * w).sum::<f64>() / total
    }

    /// Smallest `f(value)`; positive infinity for an empty distribution
    pub fn min_by<F>(&self, mut f: F) -> f64
    where
        F: FnMut(&T) -> f64,
    {
        self.results
            .iter()
            .map(|o| f(&o.value))
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest `f(value)`; negative infinity for an empty distribution
    pub fn max_by<F>(&self, mut f: F) -> f64
    where
        F: FnMut(&T) -> f64,
    {
        self.results
            .iter()
            .map(|o| f(&o.value))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Total weight of the outcomes whose value satisfies `pred`
    pub fn probability<F>(&self, mut pred: F) -> f64
    where
        F: FnMut(&T) -> bool,
    {
        self.results
            .iter()
            .filter(|o| pred(&o.value))
            .map(|o| o.weight)
            .sum()
    }

    /// Total weight carried by outcomes equal to `value`
    pub fn weight_of(&self, value: &T) -> f64
    where
        T: PartialEq,
    {
        self.probability(|v| v == value)
    }
}

impl<T> Distribution<Operand<T>> {
    /// Monadic join
    ///
    /// Every `Dist` value is replaced by its inner outcomes, each weighted by
    /// the outer weight times the inner weight. `Const` values pass through
    /// unchanged, so mixed content is fine.
    pub fn join(self) -> Distribution<T> {
        let mut results = Vec::with_capacity(self.results.len());
        for outer in self.results {
            match outer.value {
                Operand::Const(value) => results.push(Outcome::new(value, outer.weight)),
                Operand::Dist(inner) => results.extend(
                    inner
                        .results
                        .into_iter()
                        .map(|o| Outcome::new(o.value, o.weight * outer.weight)),
                ),
            }
        }
        Distribution { results }
    }
}

impl<T> FromIterator<Outcome<T>> for Distribution<T> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Distribution<T> {
    type Item = Outcome<T>;
    type IntoIter = std::vec::IntoIter<Outcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Distribution<T> {
    type Item = &'a Outcome<T>;
    type IntoIter = std::slice::Iter<'a, Outcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
