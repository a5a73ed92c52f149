//! Aggregation and row codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stampdb_bench::generate_stamps;
use stampdb_core::{aggregate, GroupBy, RowCodec, Stamp};

/// Benchmark totals with and without a breakdown.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for count in [100, 1000, 10000].iter() {
        let stamps = generate_stamps(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("totals", count), &stamps, |b, stamps| {
            b.iter(|| aggregate(black_box(stamps), None).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("by_country", count), &stamps, |b, stamps| {
            b.iter(|| aggregate(black_box(stamps), Some(GroupBy::Country)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark row encoding and decoding.
fn bench_codec(c: &mut Criterion) {
    let stamp = generate_stamps(1).remove(0);
    let row = stamp.to_row().unwrap();

    c.bench_function("to_row", |b| {
        b.iter(|| black_box(&stamp).to_row().unwrap());
    });
    c.bench_function("from_row", |b| {
        b.iter(|| Stamp::from_row(black_box(&row)).unwrap());
    });
}

criterion_group!(benches, bench_aggregate, bench_codec);
criterion_main!(benches);
