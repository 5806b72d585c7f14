//! Criterion benchmarks for offersim_core simulation
//!
//! Run with: cargo bench -p offersim_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use offersim_core::aggregate::{Parallelism, simulate_offer, simulate_offer_with};
use offersim_core::model::{OfferSpec, ParameterSet};
use offersim_core::sensitivity::compute_sensitivity;
use offersim_core::simulation::run_replicate;
use offersim_core::tiers::generate_offer_tiers;

fn standard_offer() -> OfferSpec {
    OfferSpec {
        data_gb: 2.0,
        voice_min: 100.0,
        validity_days: 28,
        price: 199.0,
        label: "Standard".to_string(),
    }
}

fn bench_single_replicate(c: &mut Criterion) {
    let offer = standard_offer();
    let params = ParameterSet::default();

    c.bench_function("single_replicate_90d", |b| {
        b.iter(|| run_replicate(black_box(&offer), black_box(&params), black_box(42)))
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    let offer = standard_offer();
    let params = ParameterSet::default();

    for replicates in [100, 500, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("replicates", replicates),
            replicates,
            |b, &m| b.iter(|| simulate_offer(black_box(&offer), black_box(&params), m, 42)),
        );
    }
    group.finish();
}

fn bench_parallelism_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallelism");
    let offer = standard_offer();
    let params = ParameterSet::default();

    group.bench_function("sequential_500", |b| {
        b.iter(|| {
            simulate_offer_with(
                black_box(&offer),
                black_box(&params),
                500,
                42,
                Parallelism::Sequential,
            )
        })
    });
    group.bench_function("auto_500", |b| {
        b.iter(|| {
            simulate_offer_with(
                black_box(&offer),
                black_box(&params),
                500,
                42,
                Parallelism::Auto,
            )
        })
    });
    group.finish();
}

fn bench_tier_ladder(c: &mut Criterion) {
    let offer = standard_offer();
    let params = ParameterSet::default();

    c.bench_function("tier_ladder_100", |b| {
        b.iter(|| generate_offer_tiers(black_box(&offer), black_box(&params), 100, 42))
    });
}

fn bench_sensitivity(c: &mut Criterion) {
    let offer = standard_offer();
    let params = ParameterSet::default();

    c.bench_function("sensitivity_50", |b| {
        b.iter(|| compute_sensitivity(black_box(&offer), black_box(&params), 50, 42))
    });
}

criterion_group!(
    benches,
    bench_single_replicate,
    bench_monte_carlo,
    bench_parallelism_modes,
    bench_tier_ladder,
    bench_sensitivity
);
criterion_main!(benches);
