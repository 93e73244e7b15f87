//! Criterion benchmarks for the Heston Monte Carlo engine.
//!
//! Benchmarks cover:
//! - Normal draw generation (pseudo-random streams and Sobol points)
//! - Path simulation for both schemes, sequential and parallel
//! - European pricing with antithetic and quasi-random variance reduction
//! - Finite-difference Greeks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_models::models::HestonParams;
use pricer_pricing::greeks::GreeksConfig;
use pricer_pricing::mc::{
    simulate_paths, DiscretisationScheme, HestonMonteCarloPricer, SimulationSpec, VanillaPayoff,
};
use pricer_pricing::rng::{PseudoRandomGenerator, QuasiRandomGenerator, RandomSource};

fn spec(n_paths: usize, n_steps: usize) -> pricer_pricing::mc::SimulationSpecBuilder {
    SimulationSpec::builder()
        .n_paths(n_paths)
        .n_steps(n_steps)
        .seed(42)
}

/// Benchmark draw generation (foundation for path simulation).
fn bench_draw_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_generation");
    let n_steps = 100;

    for n_draws in [1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("pseudo_random", n_draws),
            &n_draws,
            |b, &n| {
                let mut source = RandomSource::new(PseudoRandomGenerator::new(42), false);
                b.iter(|| black_box(source.next_batch(0, n, n_steps)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("sobol", n_draws),
            &n_draws,
            |b, &n| {
                let generator = QuasiRandomGenerator::new(n_steps, 0, Some(42)).unwrap();
                let mut source = RandomSource::new(generator, false);
                b.iter(|| black_box(source.next_batch(0, n, n_steps)))
            },
        );
    }

    group.finish();
}

/// Benchmark path simulation per scheme and execution mode.
fn bench_path_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_simulation");
    group.sample_size(20);

    let params = HestonParams::default();
    let n_steps = 100;

    for scheme in [DiscretisationScheme::Euler, DiscretisationScheme::Milstein] {
        for parallel in [false, true] {
            let id = format!("{}_{}", scheme, if parallel { "parallel" } else { "sequential" });
            let spec = spec(10_000, n_steps)
                .scheme(scheme)
                .parallel(parallel)
                .build()
                .unwrap();
            group.bench_function(id, |b| b.iter(|| simulate_paths(black_box(&params), &spec)));
        }
    }

    group.finish();
}

/// Benchmark European pricing with varying path counts and variance reduction.
fn bench_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("mc_pricing");
    group.sample_size(20);

    let params = HestonParams::default();
    let call = VanillaPayoff::call(100.0);

    for n_paths in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("european_call_antithetic", n_paths),
            &n_paths,
            |b, &n| {
                let spec = spec(n, 50).antithetic(true).build().unwrap();
                let pricer = HestonMonteCarloPricer::new(params, spec).unwrap();
                b.iter(|| pricer.price(black_box(&call)))
            },
        );
    }

    let spec = spec(10_000, 50).quasi_random(true).build().unwrap();
    let pricer = HestonMonteCarloPricer::new(params, spec).unwrap();
    group.bench_function("european_call_sobol_10000", |b| {
        b.iter(|| pricer.price(black_box(&call)))
    });

    group.finish();
}

/// Benchmark the full Greeks set (seven revaluations).
fn bench_greeks(c: &mut Criterion) {
    let mut group = c.benchmark_group("greeks");
    group.sample_size(10);

    let spec = spec(10_000, 50).antithetic(true).build().unwrap();
    let pricer = HestonMonteCarloPricer::new(HestonParams::default(), spec).unwrap();
    let call = VanillaPayoff::call(100.0);
    let config = GreeksConfig::default();

    group.bench_function("call_all_greeks", |b| {
        b.iter(|| pricer.greeks(black_box(&call), &config))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_draw_generation,
    bench_path_simulation,
    bench_pricing,
    bench_greeks
);
criterion_main!(benches);
