//! Weighted random draws from a distribution

use crate::distribution::Distribution;
use rand::{thread_rng, Rng};

impl<T> Distribution<T> {
    /// Draw one value with probability proportional to its weight
    ///
    /// Scans the outcomes accumulating weight until the running total
    /// reaches the draw. Rounding that leaves the draw past the final
    /// running total falls back to the last outcome. Returns `None` only
    /// for an empty distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let last = self.outcomes().last()?;
        let draw = rng.gen::<f64>() * self.total_weight();

        let mut running = 0.0;
        for outcome in self.iter() {
            running += outcome.weight;
            if running >= draw {
                return Some(&outcome.value);
            }
        }
        Some(&last.value)
    }

    /// One draw using the thread-local generator
    pub fn roll(&self) -> Option<T>
    where
        T: Clone,
    {
        self.sample(&mut thread_rng()).cloned()
    }

    /// `n` independent draws using the thread-local generator
    pub fn roll_n(&self, n: usize) -> Vec<T>
    where
        T: Clone,
    {
        self.roll_n_with(&mut thread_rng(), n)
    }

    /// `n` independent draws from `rng`
    pub fn roll_n_with<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<T>
    where
        T: Clone,
    {
        (0..n).filter_map(|_| self.sample(rng).cloned()).collect()
    }
}
