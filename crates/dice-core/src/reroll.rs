//! Fixed-point reroll iteration
//!
//! The reroll engine repeatedly re-resolves outcomes until every branch has
//! settled, or until the probability mass still in flight falls to the
//! convergence threshold. This expresses theoretically unbounded chains such
//! as "reroll 6s forever" without a closed form.
//!
//! # Rounds
//!
//! 1. Every outcome is summarized (`summarize(value, None, 1)`) and the
//!    summaries are bucketed by key.
//! 2. `map(summary, round)` classifies each bucket as a [`Step`]:
//!    `Terminal` values are finished as-is, `Done` distributions are spliced
//!    into the finished set, and `Continue` distributions stay pending.
//! 3. While anything is pending: fail with [`Error::RerollOverflow`] past
//!    `roll_max` rounds, stop once the pending weight is at or below
//!    `threshold`, otherwise expand the pending distributions, summarize
//!    against each entry's prior summary, bucket and classify again.
//! 4. Mass left pending at the threshold goes to `cleanup` when one is
//!    configured and is dropped otherwise.
//! 5. The finished set is bucketed once more and returned.
//!
//! Dropping the residual mass is a bounded approximation: the returned total
//! weight is at least the input weight minus `threshold`. It is reported
//! through `tracing` but never as an error.
//!
//! # Example
//!
//! ```rust
//! use dice_core::{die, Face, Reroll, Step};
//!
//! let d6 = die(6).unwrap();
//! let no_sixes = Reroll::new(|face: &Face, _round| {
//!     if face.total() == 6 {
//!         Step::Continue(d6.clone())
//!     } else {
//!         Step::Terminal(face.clone())
//!     }
//! })
//! .run(&d6)
//! .unwrap();
//!
//! assert_eq!(no_sixes.weight_of(&Face::Scalar(6)), 0.0);
//! ```

use crate::bucket::GroupKey;
use crate::distribution::{Distribution, Outcome};
use crate::error::{Error, Result};
use std::hash::Hash;
use tracing::{debug, instrument, trace, warn};

/// Default pending weight at or below which iteration stops
pub const DEFAULT_THRESHOLD: f64 = 0.0001;

/// Default hard cap on reroll rounds
pub const DEFAULT_ROLL_MAX: usize = 1000;

/// What a reroll `map` callback decided for one summary
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T, U> {
    /// Finished with this value, weight unchanged
    Terminal(U),
    /// Roll this distribution again next round
    Continue(Distribution<T>),
    /// Finished with this distribution of values
    Done(Distribution<U>),
}

/// An unfinished branch, as handed to a cleanup callback
#[derive(Debug, Clone, PartialEq)]
pub struct Pending<T, S> {
    /// The distribution that would have been rolled next
    pub distribution: Distribution<T>,
    /// Probability mass of the branch
    pub weight: f64,
    /// The last summary of the branch
    pub summary: S,
}

/// Termination settings for the reroll loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RerollConfig {
    /// Minimum aggregate pending weight required to keep iterating
    pub threshold: f64,
    /// Maximum number of rounds before failing
    pub roll_max: usize,
}

impl Default for RerollConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            roll_max: DEFAULT_ROLL_MAX,
        }
    }
}

impl RerollConfig {
    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the round cap
    pub fn with_roll_max(mut self, roll_max: usize) -> Self {
        self.roll_max = roll_max;
        self
    }

    /// Check the settings before running
    pub fn validate(&self) -> Result<()> {
        Error::check_threshold(self.threshold)
    }
}

type SummarizeFn<'a, T, S> = Box<dyn Fn(&T, Option<&S>, usize) -> S + 'a>;
type MapFn<'a, T, S, U> = Box<dyn Fn(&S, usize) -> Step<T, U> + 'a>;
type KeyFn<'a, S, K> = Box<dyn Fn(&S) -> K + 'a>;
type JoinFn<'a, S> = Box<dyn Fn(Vec<S>) -> S + 'a>;
type CleanupFn<'a, T, S, U> = Box<dyn Fn(Vec<Pending<T, S>>) -> Vec<Outcome<U>> + 'a>;

/// A configured reroll computation
///
/// `T` is the rolled value type, `S` the per-branch summary threaded between
/// rounds, `U` the finished value type and `K` the key summaries are merged
/// on (the summary's [`GroupKey`] unless overridden with [`Reroll::key`]).
pub struct Reroll<'a, T, S, U, K> {
    summarize: SummarizeFn<'a, T, S>,
    map: MapFn<'a, T, S, U>,
    key: KeyFn<'a, S, K>,
    join: Option<JoinFn<'a, S>>,
    cleanup: Option<CleanupFn<'a, T, S, U>>,
    config: RerollConfig,
}

impl<'a, T, U> Reroll<'a, T, T, U, T::Key>
where
    T: GroupKey + Clone + 'a,
{
    /// Reroll where each value is its own summary
    pub fn new<M>(map: M) -> Self
    where
        M: Fn(&T, usize) -> Step<T, U> + 'a,
    {
        Self::with_summary(|value: &T, _prior: Option<&T>, _round| value.clone(), map)
    }
}

impl<'a, T, S, U> Reroll<'a, T, S, U, S::Key>
where
    S: GroupKey + Clone,
{
    /// Reroll with a summary accumulated across rounds
    ///
    /// `summarize(value, prior, round)` receives `None` as the prior in round
    /// one and the branch's previous summary afterwards.
    pub fn with_summary<F, M>(summarize: F, map: M) -> Self
    where
        F: Fn(&T, Option<&S>, usize) -> S + 'a,
        M: Fn(&S, usize) -> Step<T, U> + 'a,
    {
        Self {
            summarize: Box::new(summarize),
            map: Box::new(map),
            key: Box::new(|summary: &S| summary.group_key()),
            join: None,
            cleanup: None,
            config: RerollConfig::default(),
        }
    }
}

impl<'a, T, S, U, K> Reroll<'a, T, S, U, K>
where
    S: Clone,
    K: Hash + Eq,
{
    /// Group summaries by `key` instead of their declared key
    ///
    /// The key type is free, so summaries can merge on any projection.
    pub fn key<K2, F>(self, key: F) -> Reroll<'a, T, S, U, K2>
    where
        K2: Hash + Eq,
        F: Fn(&S) -> K2 + 'a,
    {
        Reroll {
            summarize: self.summarize,
            map: self.map,
            key: Box::new(key),
            join: self.join,
            cleanup: self.cleanup,
            config: self.config,
        }
    }

    /// Build bucket representatives with `join` instead of keeping the first
    pub fn join<J>(mut self, join: J) -> Self
    where
        J: Fn(Vec<S>) -> S + 'a,
    {
        self.join = Some(Box::new(join));
        self
    }

    /// Resolve mass still pending at the threshold instead of dropping it
    pub fn cleanup<C>(mut self, cleanup: C) -> Self
    where
        C: Fn(Vec<Pending<T, S>>) -> Vec<Outcome<U>> + 'a,
    {
        self.cleanup = Some(Box::new(cleanup));
        self
    }

    /// Set the convergence threshold
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the round cap
    pub fn roll_max(mut self, roll_max: usize) -> Self {
        self.config.roll_max = roll_max;
        self
    }

    /// Replace both termination settings
    pub fn config(mut self, config: RerollConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the reroll loop over `dist`
    #[instrument(skip_all, fields(outcomes = dist.len(), threshold = self.config.threshold, roll_max = self.config.roll_max))]
    pub fn run(&self, dist: &Distribution<T>) -> Result<Distribution<U>>
    where
        U: GroupKey + Clone,
    {
        self.config.validate()?;

        let mut round = 1;
        let mut finished: Vec<Outcome<U>> = Vec::new();
        let mut pending: Vec<Pending<T, S>> = Vec::new();

        let summaries = self.consolidate(dist.map(|value| (self.summarize)(value, None, round)));
        self.classify(summaries, round, &mut finished, &mut pending);

        while !pending.is_empty() {
            if round > self.config.roll_max {
                warn!(round, pending = pending.len(), "reroll exceeded round cap");
                return Err(Error::RerollOverflow {
                    rounds: round,
                    limit: self.config.roll_max,
                });
            }

            let pending_weight: f64 = pending.iter().map(|p| p.weight).sum();
            trace!(round, entries = pending.len(), pending_weight, "reroll round");
            if pending_weight <= self.config.threshold {
                break;
            }

            let next_round = round + 1;
            let mut expanded = Vec::new();
            for entry in std::mem::take(&mut pending) {
                for outcome in entry.distribution.iter() {
                    let summary = (self.summarize)(&outcome.value, Some(&entry.summary), next_round);
                    expanded.push(Outcome::new(summary, entry.weight * outcome.weight));
                }
            }

            let summaries = self.consolidate(Distribution::from_outcomes(expanded));
            self.classify(summaries, next_round, &mut finished, &mut pending);
            round = next_round;
        }

        if !pending.is_empty() {
            let residual: f64 = pending.iter().map(|p| p.weight).sum();
            match &self.cleanup {
                Some(cleanup) => {
                    debug!(round, residual, entries = pending.len(), "cleaning up residual mass");
                    finished.extend(cleanup(pending));
                }
                None => debug!(round, residual, "dropping residual mass below threshold"),
            }
        }

        debug!(round, outcomes = finished.len(), "reroll finished");
        Ok(Distribution::from_outcomes(finished).bucket())
    }

    fn consolidate(&self, summaries: Distribution<S>) -> Distribution<S> {
        match &self.join {
            Some(join) => summaries.bucket_with(|s| (self.key)(s), |group| join(group)),
            None => summaries.bucket_by_key(|s| (self.key)(s)),
        }
    }

    fn classify(
        &self,
        summaries: Distribution<S>,
        round: usize,
        finished: &mut Vec<Outcome<U>>,
        pending: &mut Vec<Pending<T, S>>,
    ) {
        for Outcome { value: summary, weight } in summaries {
            match (self.map)(&summary, round) {
                Step::Terminal(value) => finished.push(Outcome::new(value, weight)),
                Step::Done(dist) => finished.extend(
                    dist.into_iter()
                        .map(|inner| Outcome::new(inner.value, inner.weight * weight)),
                ),
                Step::Continue(distribution) => pending.push(Pending {
                    distribution,
                    weight,
                    summary,
                }),
            }
        }
    }
}

/// Shorthand for [`Reroll::new`] run with default settings
pub fn reroll<T, U, M>(dist: &Distribution<T>, map: M) -> Result<Distribution<U>>
where
    T: GroupKey + Clone,
    U: GroupKey + Clone,
    M: Fn(&T, usize) -> Step<T, U>,
{
    Reroll::new(map).run(dist)
}
