use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BenchmarkId,
    Criterion,
};
use pmpkit::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_fisher_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("fisher_exact");
    for (label, table) in [
        ("small", [[8, 2], [1, 5]]),
        ("deep", [[5, 105], [1_000, 999_000]]),
        ("balanced", [[500, 500], [480, 520]]),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &table, |b, table| {
            b.iter(|| fisher_exact(black_box(*table), Alternative::Greater))
        });
    }
    group.finish();
}

fn bench_simulate_power(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_power");
    for n2 in [10u64, 110, 1_010] {
        group.bench_with_input(BenchmarkId::from_parameter(n2), &n2, |b, &n2| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter(|| simulate_power(0.001, 0.05, 1_000_000, black_box(n2), 0.05, 100, &mut rng))
        });
    }
    group.finish();
}

fn bench_estimate_required_depth(c: &mut Criterion) {
    let config = PowerConfig::default().with_n_trials(200);
    c.bench_function("estimate_required_depth", |b| {
        b.iter(|| estimate_required_depth(black_box(0.01), black_box(0.05), 100_000, &config))
    });
}

criterion_group!(
    benches,
    bench_fisher_exact,
    bench_simulate_power,
    bench_estimate_required_depth
);
criterion_main!(benches);
