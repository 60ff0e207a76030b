//! Bucketing: consolidating outcomes that share a derived key
//!
//! Partitions keep first-seen key order and carry the summed weight of
//! their members. The derived face operators (`sum`, `count`, `replace`)
//! bucket and then sort ascending.

use crate::combine::combine;
use crate::distribution::{Distribution, Operand, Outcome};
use crate::face::Face;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// A value's declared grouping key
///
/// Used as the default key when bucketing, and by the reroll engine to merge
/// equivalent summaries between rounds.
pub trait GroupKey {
    /// Key type; equal keys land in the same bucket
    type Key: Hash + Eq;

    /// The key of this value
    fn group_key(&self) -> Self::Key;
}

impl GroupKey for Face {
    type Key = Face;

    fn group_key(&self) -> Face {
        self.clone()
    }
}

impl GroupKey for String {
    type Key = String;

    fn group_key(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_group_key_for_scalar {
    ($($t:ty),*) => {
        $(
            impl GroupKey for $t {
                type Key = $t;

                fn group_key(&self) -> $t {
                    *self
                }
            }
        )*
    };
}

impl_group_key_for_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, bool, char);

impl GroupKey for &str {
    type Key = String;

    fn group_key(&self) -> String {
        (*self).to_string()
    }
}

/// Sequences group element-wise, so `product` output buckets directly
impl<T: GroupKey> GroupKey for Vec<T> {
    type Key = Vec<T::Key>;

    fn group_key(&self) -> Vec<T::Key> {
        self.iter().map(GroupKey::group_key).collect()
    }
}

impl<T: GroupKey> GroupKey for Option<T> {
    type Key = Option<T::Key>;

    fn group_key(&self) -> Option<T::Key> {
        self.as_ref().map(GroupKey::group_key)
    }
}

impl<T: GroupKey + ?Sized> GroupKey for Box<T> {
    type Key = T::Key;

    fn group_key(&self) -> T::Key {
        (**self).group_key()
    }
}

macro_rules! impl_group_key_for_tuple {
    ($(($($name:ident),+)),*) => {
        $(
            #[allow(non_snake_case)]
            impl<$($name: GroupKey),+> GroupKey for ($($name,)+) {
                type Key = ($($name::Key,)+);

                fn group_key(&self) -> Self::Key {
                    let ($($name,)+) = self;
                    ($($name.group_key(),)+)
                }
            }
        )*
    };
}

impl_group_key_for_tuple!((A), (A, B), (A, B, C), (A, B, C, D), (A, B, C, D, E), (A, B, C, D, E, F));

impl<T> Distribution<T> {
    /// Bucket by `key`, representing each bucket by its first-seen value
    pub fn bucket_by_key<K, F>(&self, mut key: F) -> Distribution<T>
    where
        T: Clone,
        K: Hash + Eq,
        F: FnMut(&T) -> K,
    {
        let mut index: HashMap<K, usize> = HashMap::new();
        let mut buckets: Vec<Outcome<T>> = Vec::new();

        for outcome in self.iter() {
            let k = key(&outcome.value);
            match index.get(&k) {
                Some(&i) => buckets[i].weight += outcome.weight,
                None => {
                    index.insert(k, buckets.len());
                    buckets.push(outcome.clone());
                }
            }
        }

        Distribution::from_outcomes(buckets)
    }

    /// Bucket by `key`, building each representative with `join`
    ///
    /// `join` receives every value of a bucket in encounter order; buckets
    /// are never empty.
    pub fn bucket_with<K, F, J>(&self, mut key: F, mut join: J) -> Distribution<T>
    where
        T: Clone,
        K: Hash + Eq,
        F: FnMut(&T) -> K,
        J: FnMut(Vec<T>) -> T,
    {
        let mut index: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<(Vec<T>, f64)> = Vec::new();

        for outcome in self.iter() {
            let k = key(&outcome.value);
            match index.get(&k) {
                Some(&i) => {
                    groups[i].0.push(outcome.value.clone());
                    groups[i].1 += outcome.weight;
                }
                None => {
                    index.insert(k, groups.len());
                    groups.push((vec![outcome.value.clone()], outcome.weight));
                }
            }
        }

        groups
            .into_iter()
            .map(|(values, weight)| Outcome::new(join(values), weight))
            .collect()
    }

    /// Bucket by each value's declared [`GroupKey`]
    pub fn bucket(&self) -> Distribution<T>
    where
        T: GroupKey + Clone,
    {
        self.bucket_by_key(T::group_key)
    }

    /// Bucket by each value's string form
    ///
    /// Fallback for value types without a [`GroupKey`]; values that print
    /// the same share a bucket.
    pub fn bucket_by_display(&self) -> Distribution<T>
    where
        T: fmt::Display + Clone,
    {
        self.bucket_by_key(ToString::to_string)
    }
}

impl Distribution<Face> {
    /// Distribution of face totals, ascending
    pub fn sum(&self) -> Distribution<Face> {
        let mut out = self.map(|face| Face::Scalar(face.total())).bucket();
        out.sort_by_key(Face::total);
        out
    }

    /// Distribution of how many scalar faces equal `target`
    pub fn count(&self, target: i64) -> Distribution<Face> {
        self.count_where(|n| n == target)
    }

    /// Distribution of how many scalar faces satisfy `pred`
    pub fn count_where<P>(&self, pred: P) -> Distribution<Face>
    where
        P: Fn(i64) -> bool,
    {
        let mut out = self
            .map(|face| {
                let hits = face.flatten().into_iter().filter(|&n| pred(n)).count();
                Face::Scalar(hits as i64)
            })
            .bucket();
        out.sort_by_key(Face::total);
        out
    }

    /// Replace every scalar face matching `pred` with `replacement(face)`
    ///
    /// The replacement may be a constant or a whole distribution; outcomes
    /// with distribution replacements are expanded through [`combine`] so
    /// each resulting outcome is again a flat sequence of faces.
    pub fn replace<P, R>(&self, pred: P, replacement: R) -> Distribution<Face>
    where
        P: Fn(&Face) -> bool,
        R: Fn(&Face) -> Operand<Face>,
    {
        let mut out = self
            .flat_map(|value| {
                let operands: Vec<Operand<Face>> = value
                    .flatten()
                    .into_iter()
                    .map(Face::Scalar)
                    .map(|face| {
                        if pred(&face) {
                            replacement(&face)
                        } else {
                            Operand::Const(face)
                        }
                    })
                    .collect();
                Operand::Dist(combine(&operands))
            })
            .bucket();
        out.sort_by_key(Face::total);
        out
    }
}
