//! Benchmarks for PQ-kNN training and prediction.
//!
//! Run with: `cargo bench -p pqknn`
//!
//! Compare SIMD vs scalar: `cargo bench -p pqknn --features scalar`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pqknn::distance::euclidean_distance_squared;
use pqknn::{Label, PqKnn, PqKnnConfig};
use rand::Rng;

/// Image-like dimension: a flattened 28×28 grid.
const DIM: usize = 784;

/// Generate `count` random pixel vectors with labels in `0..10`.
fn random_dataset(count: usize) -> (Vec<Vec<u32>>, Vec<Label>) {
    let mut rng = rand::thread_rng();
    let vectors =
        (0..count).map(|_| (0..DIM).map(|_| rng.gen_range(0..256)).collect()).collect();
    let labels = (0..count).map(|_| rng.gen_range(0..10)).collect();
    (vectors, labels)
}

fn trained_model(records: usize, n: usize, c: u32) -> (PqKnn, Vec<Vec<u32>>) {
    let (vectors, labels) = random_dataset(records);
    let mut model = PqKnn::new(PqKnnConfig::new(n, c).with_max_iterations(10))
        .expect("valid configuration");
    model.train(&vectors, &labels).expect("training succeeds");
    (model, vectors)
}

/// Benchmark training for increasing sub-vector counts.
fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");
    group.sample_size(10);

    let (vectors, labels) = random_dataset(1_000);
    for n in [7, 14, 28] {
        group.throughput(Throughput::Elements(vectors.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                let config = PqKnnConfig::new(n, 5).with_max_iterations(10);
                let mut model = PqKnn::new(config).expect("valid configuration");
                model.train(black_box(&vectors), black_box(&labels)).expect("training succeeds");
                model
            });
        });
    }

    group.finish();
}

/// Benchmark training with and without rayon.
fn bench_train_parallel_vs_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("train_parallelism");
    group.sample_size(10);

    let (vectors, labels) = random_dataset(1_000);
    for parallel in [true, false] {
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |bench| {
            bench.iter(|| {
                let config =
                    PqKnnConfig::new(28, 5).with_max_iterations(10).with_parallel(parallel);
                let mut model = PqKnn::new(config).expect("valid configuration");
                model.train(black_box(&vectors), black_box(&labels)).expect("training succeeds");
                model
            });
        });
    }

    group.finish();
}

/// Benchmark building the k × n distance table for one query.
fn bench_distance_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_table");

    for bits in [4, 6, 8] {
        let (model, vectors) = trained_model(512, 28, bits);
        let query = &vectors[0];

        group.bench_with_input(BenchmarkId::from_parameter(1 << bits), &bits, |bench, _| {
            bench.iter(|| model.distance_table(black_box(query)).expect("trained"));
        });
    }

    group.finish();
}

/// Benchmark a single prediction against varying numbers of stored records.
fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    for records in [1_000, 5_000] {
        let (model, vectors) = trained_model(records, 28, 6);
        let query = &vectors[records / 2];

        group.throughput(Throughput::Elements(records as u64));
        group.bench_with_input(BenchmarkId::from_parameter(records), &records, |bench, _| {
            bench.iter(|| model.predict(black_box(query), 10).expect("valid query"));
        });
    }

    group.finish();
}

/// Compare approximate prediction against a brute-force exact scan.
fn bench_exact_scan_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_scan");

    let (vectors, _) = random_dataset(5_000);
    let as_floats: Vec<Vec<f32>> =
        vectors.iter().map(|v| v.iter().map(|&x| x as f32).collect()).collect();
    let query = as_floats[0].clone();

    group.throughput(Throughput::Elements(as_floats.len() as u64));
    group.bench_function("5000", |bench| {
        bench.iter(|| {
            as_floats
                .iter()
                .map(|v| euclidean_distance_squared(black_box(&query), v))
                .fold(f32::INFINITY, f32::min)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_train,
    bench_train_parallel_vs_sequential,
    bench_distance_table,
    bench_predict,
    bench_exact_scan_baseline,
);
criterion_main!(benches);
