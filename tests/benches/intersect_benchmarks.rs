//! # Vector-Trie Benchmarks
//!
//! Throughput of bulk insertion and of multi-way intersection, with and
//! without filter pruning, over synthetic key sets at several overlap
//! levels.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trie_datagen::KeySetGenerator;
use vector_trie::{intersect, TrieConfig, TrieConfigBuilder, VectorTrie};

/// Filter sizing for benches: large enough to exercise pruning, small
/// enough that deep-node allocation does not dominate the runs.
fn bench_config() -> TrieConfig {
    TrieConfigBuilder::new()
        .filter_size_exponent(16)
        .build()
        .expect("valid bench config")
}

fn trie_from(keys: &[i32]) -> VectorTrie<usize> {
    let mut trie = VectorTrie::with_config(bench_config()).expect("valid bench config");
    for (index, &key) in keys.iter().enumerate() {
        trie.insert(key, index);
    }
    trie
}

fn bench_insert_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie-insert");

    for size in [1_000usize, 10_000] {
        let keys = KeySetGenerator::with_seed(1).uniform(size, 0.2);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("bulk_insert", size), &keys, |b, keys| {
            b.iter(|| black_box(trie_from(keys)))
        });
    }

    group.finish();
}

fn bench_intersection(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie-intersect");

    for overlap in [0.05f64, 0.3, 0.8] {
        let mut generator = KeySetGenerator::with_seed(2);
        let base = generator.uniform(10_000, 0.2);
        let second = generator.overlapping(5_000, &base, overlap);
        let third = generator.overlapping(5_000, &base, overlap);
        let tries = vec![trie_from(&base), trie_from(&second), trie_from(&third)];

        group.throughput(Throughput::Elements(base.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("exact", format!("overlap-{overlap}")),
            &tries,
            |b, tries| b.iter(|| black_box(intersect(tries, false).count())),
        );
        group.bench_with_input(
            BenchmarkId::new("filtered", format!("overlap-{overlap}")),
            &tries,
            |b, tries| b.iter(|| black_box(intersect(tries, true).count())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_insert_throughput, bench_intersection);
criterion_main!(benches);
