//! Benchmarks for combination expansion and reroll convergence

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dice_core::{dice, die, ExplodeOptions, Face, Reroll, RerollConfig, Step};

/// Benchmark summing pools of d6 of increasing size
fn bench_combine_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_sum");

    for &count in &[2usize, 4, 6] {
        group.bench_with_input(BenchmarkId::new("d6", count), &count, |b, &count| {
            b.iter(|| black_box(dice(count, 6).map(|pool| pool.sum())));
        });
    }

    group.finish();
}

/// Benchmark keep-highest on the classic 4d6 drop lowest
fn bench_keep_highest(c: &mut Criterion) {
    let pool = dice(4, 6).unwrap();
    c.bench_function("4d6_keep_highest_3", |b| {
        b.iter(|| black_box(pool.keep_highest(3)));
    });
}

/// Benchmark reroll convergence at several thresholds
fn bench_reroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("reroll_sixes");
    let d6 = die(6).unwrap();

    for &threshold in &[1e-3, 1e-6, 1e-9] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{threshold:e}")),
            &threshold,
            |b, &threshold| {
                b.iter(|| {
                    let result = Reroll::new(|face: &Face, _| {
                        if face.total() == 6 {
                            Step::Continue(d6.clone())
                        } else {
                            Step::Terminal(face.clone())
                        }
                    })
                    .threshold(threshold)
                    .run(&d6);
                    black_box(result)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark unlimited explosion of a 2d6 pool
fn bench_explode(c: &mut Criterion) {
    let pool = dice(2, 6).unwrap();
    let config = RerollConfig::default().with_threshold(1e-6);
    c.bench_function("2d6_explode", |b| {
        b.iter(|| black_box(pool.explode_with(ExplodeOptions::new().with_config(config))));
    });
}

criterion_group!(benches, bench_combine_sum, bench_keep_highest, bench_reroll, bench_explode);
criterion_main!(benches);
