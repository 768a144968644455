use alphabet_entropy::estimation::{
    EntropyApproach, EstimationOracle, EstimatorParams, MiApproach, NativeOracle,
};
use alphabet_entropy::sampling::SampleSpec;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Seeded normal integer samples clamped to `[0, 100]`.
fn samples(size: usize, seed: u64) -> Vec<i64> {
    SampleSpec::normal(size, 50.0, 20.0)
        .with_seed(seed)
        .generate()
        .unwrap_or_default()
}

fn bench_discrete_entropy(c: &mut Criterion) {
    let oracle = NativeOracle::new();
    let params = EstimatorParams::default();
    let data = samples(1000, 42);

    let mut group = c.benchmark_group("Discrete Entropy - Approach");
    for approach in EntropyApproach::DISCRETE {
        group.bench_with_input(BenchmarkId::from_parameter(approach), &approach, |b, &a| {
            b.iter(|| black_box(oracle.estimate_entropy(black_box(&data), a, &params)));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("Discrete Entropy - Data Size");
    for size in [100, 1000, 10000] {
        let data = samples(size, 42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(oracle.estimate_entropy(
                    black_box(&data),
                    EntropyApproach::MillerMadow,
                    &params,
                ))
            });
        });
    }
    group.finish();
}

fn bench_continuous(c: &mut Criterion) {
    let oracle = NativeOracle::new();
    let params = EstimatorParams::default();

    let mut group = c.benchmark_group("Continuous Entropy");
    for size in [100, 1000] {
        let data = samples(size, 7);
        for approach in EntropyApproach::CONTINUOUS {
            group.bench_with_input(BenchmarkId::new(approach.as_str(), size), &size, |b, _| {
                b.iter(|| black_box(oracle.estimate_entropy(black_box(&data), approach, &params)));
            });
        }
    }
    group.finish();

    let mut group = c.benchmark_group("Mutual Information");
    for size in [100, 500] {
        let x = samples(size, 1);
        let y = samples(size, 2);
        for approach in MiApproach::ALL {
            group.bench_with_input(BenchmarkId::new(approach.as_str(), size), &size, |b, _| {
                b.iter(|| {
                    black_box(oracle.estimate_mutual_information(
                        black_box(&x),
                        black_box(&y),
                        approach,
                        &params,
                    ))
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_discrete_entropy, bench_continuous);
criterion_main!(benches);
