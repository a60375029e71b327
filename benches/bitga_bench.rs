//! Criterion benchmarks for u-bitga.
//!
//! Uses a cheap synthetic objective (OneMax) to measure engine overhead:
//! caching, selection, and the genetic operators.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_bitga::ga::{
    mutate, n_point_crossover, random_splits, BitGa, CountingObjective, FitnessCache, GaConfig,
    Genome, Selection,
};
use u_bitga::random::create_rng;

fn ones(bits: &[bool]) -> f64 {
    bits.iter().filter(|&&b| b).count() as f64
}

fn onemax() -> CountingObjective<fn(&[bool]) -> f64> {
    CountingObjective::new(ones as fn(&[bool]) -> f64)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_ga_onemax(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_onemax");
    group.sample_size(10);

    for (dim, pop, budget) in [
        (50usize, 40usize, 5_000usize),
        (100, 100, 10_000),
        (200, 100, 10_000),
    ] {
        for selection in [Selection::Random, Selection::Roulette] {
            let config = GaConfig::default()
                .with_population_size(pop)
                .with_selection(selection)
                .with_mutation_rate(1.0 / dim as f64)
                .with_seed(42);
            group.bench_with_input(
                BenchmarkId::new(format!("{selection}_d{dim}_p{pop}"), budget),
                &config,
                |b, config| {
                    b.iter(|| {
                        let mut ga = BitGa::new(onemax(), budget, dim);
                        ga.configure(config.clone()).unwrap();
                        let result = ga.run().unwrap().best_fitness;
                        black_box(result)
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_cache_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_lookup");

    for &dim in &[50, 500] {
        let mut rng = create_rng(42);
        let genomes: Vec<Genome> = (0..256).map(|_| Genome::random(dim, &mut rng)).collect();
        let mut cache = FitnessCache::new();
        let mut objective = onemax();
        for g in &genomes {
            cache.evaluate(g, &mut objective);
        }
        group.bench_with_input(BenchmarkId::from_parameter(dim), &genomes, |b, genomes| {
            b.iter(|| {
                for g in genomes {
                    black_box(cache.evaluate(black_box(g), &mut objective));
                }
            })
        });
    }
    group.finish();
}

fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");
    let mut rng = create_rng(42);
    let dim = 1_000;
    let a = Genome::random(dim, &mut rng);
    let b = Genome::random(dim, &mut rng);

    group.bench_function("n_point_4", |bench| {
        bench.iter(|| {
            let splits = random_splits(dim, 4, &mut rng);
            black_box(n_point_crossover(a.clone(), b.clone(), &splits))
        })
    });
    group.bench_function("mutate_0.01", |bench| {
        let mut g = a.clone();
        bench.iter(|| black_box(mutate(&mut g, 0.01, &mut rng)))
    });
    group.finish();
}

criterion_group!(benches, bench_ga_onemax, bench_cache_lookup, bench_operators);
criterion_main!(benches);
