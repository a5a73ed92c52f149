//! Store operation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stampdb_bench::{generate_stamps, populated_store};
use stampdb_core::{Condition, Criteria, StampId, StampStore, StoreConfig};
use tempfile::TempDir;

/// Benchmark single creates, each in its own transaction.
fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");
    group.throughput(Throughput::Elements(1));

    group.bench_function("memory", |b| {
        let store = StampStore::open_in_memory().unwrap();
        let stamp = generate_stamps(1).remove(0);
        b.iter(|| store.create(black_box(&stamp)).unwrap());
    });

    group.bench_function("file", |b| {
        let dir = TempDir::new().unwrap();
        let store =
            StampStore::open_with_config(dir.path().join("bench.db"), StoreConfig::default())
                .unwrap();
        let stamp = generate_stamps(1).remove(0);
        b.iter(|| store.create(black_box(&stamp)).unwrap());
    });

    group.finish();
}

/// Benchmark batch creates in one transaction.
fn bench_create_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_many");

    for batch_size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &batch_size| {
                let store = StampStore::open_in_memory().unwrap();
                let stamps = generate_stamps(batch_size);
                b.iter(|| store.create_many(black_box(&stamps)).unwrap());
            },
        );
    }
    group.finish();
}

/// Benchmark reads by identifier.
fn bench_read(c: &mut Criterion) {
    let store = populated_store(1000);
    let id = StampId::new(500);
    c.bench_function("read", |b| {
        b.iter(|| store.read(black_box(id)).unwrap());
    });
}

/// Benchmark searches over stores of increasing size.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let criteria = Criteria::new()
        .contains("country", "an")
        .between("year", 1900, 1950)
        .equals("condition", Condition::Mint);

    for count in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let store = populated_store(count);
            b.iter(|| store.search(black_box(&criteria)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark full listing.
fn bench_list_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_all");

    for count in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let store = populated_store(count);
            b.iter(|| store.list_all().unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_create_many,
    bench_read,
    bench_search,
    bench_list_all
);
criterion_main!(benches);
