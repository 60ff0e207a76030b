//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;
use dice_core::{Distribution, Face};

pub const EPSILON: f64 = 1e-10;

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Weight of all outcomes whose faces sum to `total`
pub fn weight_of_total(dist: &Distribution<Face>, total: i64) -> f64 {
    dist.probability(|face| face.total() == total)
}

/// Sorted `(total, weight)` pairs for comparing two face distributions
pub fn totals(dist: &Distribution<Face>) -> Vec<(i64, f64)> {
    dist.sum()
        .iter()
        .map(|o| (o.value.total(), o.weight))
        .collect()
}

/// Assert two face distributions agree on every total
pub fn assert_same_totals(actual: &Distribution<Face>, expected: &Distribution<Face>) {
    let a = totals(actual);
    let e = totals(expected);
    assert_eq!(
        a.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
        e.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
        "support mismatch"
    );
    for ((total, wa), (_, we)) in a.iter().zip(e.iter()) {
        assert!(
            (wa - we).abs() < EPSILON,
            "weight mismatch at {total}: {wa} vs {we}"
        );
    }
}
