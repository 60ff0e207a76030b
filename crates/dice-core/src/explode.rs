//! Exploding dice
//!
//! An exploding roll that meets its trigger is rolled again and the new
//! result is added to the running total, recursively. Unlimited explosions
//! are resolved by the reroll engine's convergence cutoff.

use crate::bucket::GroupKey;
use crate::distribution::Distribution;
use crate::error::Result;
use crate::face::Face;
use crate::reroll::{Reroll, RerollConfig, Step};

/// Where an explosion triggers when no explicit predicate is given
pub enum ExplodeThreshold<'a> {
    /// The largest total the distribution can produce
    Maximum,
    /// A fixed total
    AtLeast(i64),
    /// A total computed from the distribution being exploded
    Computed(Box<dyn Fn(&Distribution<Face>) -> i64 + 'a>),
}

/// Settings for [`Distribution::explode_with`]
pub struct ExplodeOptions<'a> {
    threshold: ExplodeThreshold<'a>,
    predicate: Option<Box<dyn Fn(&Face) -> bool + 'a>>,
    sum: Box<dyn Fn(&Face) -> i64 + 'a>,
    times: Option<usize>,
    config: RerollConfig,
}

impl Default for ExplodeOptions<'_> {
    fn default() -> Self {
        Self {
            threshold: ExplodeThreshold::Maximum,
            predicate: None,
            sum: Box::new(Face::total),
            times: None,
            config: RerollConfig::default(),
        }
    }
}

impl<'a> ExplodeOptions<'a> {
    /// Default options: explode on the maximum, without limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Explode whenever the rolled total is at least `threshold`
    pub fn at_least(mut self, threshold: i64) -> Self {
        self.threshold = ExplodeThreshold::AtLeast(threshold);
        self
    }

    /// Derive the threshold from the distribution being exploded
    pub fn threshold_from<F>(mut self, f: F) -> Self
    where
        F: Fn(&Distribution<Face>) -> i64 + 'a,
    {
        self.threshold = ExplodeThreshold::Computed(Box::new(f));
        self
    }

    /// Explode whenever `pred` holds; overrides any threshold
    pub fn when<P>(mut self, pred: P) -> Self
    where
        P: Fn(&Face) -> bool + 'a,
    {
        self.predicate = Some(Box::new(pred));
        self
    }

    /// How a rolled value contributes to the running total
    pub fn summed_by<F>(mut self, sum: F) -> Self
    where
        F: Fn(&Face) -> i64 + 'a,
    {
        self.sum = Box::new(sum);
        self
    }

    /// Allow at most `times` extra rolls
    pub fn times(mut self, times: usize) -> Self {
        self.times = Some(times);
        self
    }

    /// Termination settings for the underlying reroll
    pub fn with_config(mut self, config: RerollConfig) -> Self {
        self.config = config;
        self
    }
}

/// Running state of one exploding branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplodeSummary {
    /// Contribution of the latest roll
    pub roll: i64,
    /// Sum of every roll so far
    pub total: i64,
    /// Whether the latest roll triggers another
    pub explodes: bool,
}

impl GroupKey for ExplodeSummary {
    type Key = (bool, i64);

    fn group_key(&self) -> (bool, i64) {
        (self.explodes, self.total)
    }
}

impl Distribution<Face> {
    /// Explode on the maximum total with no limit on repeats
    pub fn explode(&self) -> Result<Distribution<Face>> {
        self.explode_with(ExplodeOptions::default())
    }

    /// Explode according to `options`; the result holds running totals
    pub fn explode_with(&self, options: ExplodeOptions<'_>) -> Result<Distribution<Face>> {
        let ExplodeOptions {
            threshold,
            predicate,
            sum,
            times,
            config,
        } = options;

        let triggers: Box<dyn Fn(&Face) -> bool + '_> = match predicate {
            Some(pred) => pred,
            None => {
                let limit = match threshold {
                    ExplodeThreshold::Maximum => self.values().map(|v| sum(v)).max().unwrap_or(i64::MAX),
                    ExplodeThreshold::AtLeast(n) => n,
                    ExplodeThreshold::Computed(f) => f(self),
                };
                let sum = &sum;
                Box::new(move |face: &Face| sum(face) >= limit)
            }
        };

        let mut out = Reroll::with_summary(
            |value: &Face, prior: Option<&ExplodeSummary>, _round| {
                let roll = sum(value);
                ExplodeSummary {
                    roll,
                    total: prior.map_or(0, |p| p.total).saturating_add(roll),
                    explodes: triggers(value),
                }
            },
            |summary: &ExplodeSummary, round| {
                let exhausted = times.is_some_and(|limit| round > limit);
                if summary.explodes && !exhausted {
                    Step::Continue(self.clone())
                } else {
                    Step::Terminal(Face::Scalar(summary.total))
                }
            },
        )
        .config(config)
        .run(self)?;

        out.sort_by_key(Face::total);
        Ok(out)
    }
}
