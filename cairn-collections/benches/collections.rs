//! Throughput benchmarks for `RbMap` and `PriorityQueue`.
//!
//! Compares against `std::collections::{BTreeMap, BinaryHeap}`.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use cairn_collections::{PriorityQueue, RbMap};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_keys(n: usize) -> Vec<u32> {
    let mut rng = SmallRng::seed_from_u64(42);
    (0..n).map(|_| rng.random()).collect()
}

// ============================================================================
// Map
// ============================================================================

fn bench_map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert");

    for n in [1_000usize, 100_000] {
        let keys = random_keys(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("rb_map", n), &keys, |b, keys| {
            b.iter(|| {
                let mut map = RbMap::with_capacity(keys.len());
                for &k in keys {
                    map.insert(k, k);
                }
                black_box(map.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("btree_map", n), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in keys {
                    map.insert(k, k);
                }
                black_box(map.len())
            });
        });
    }

    group.finish();
}

fn bench_map_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_get");
    let keys = random_keys(100_000);

    let rb: RbMap<u32, u32> = keys.iter().map(|&k| (k, k)).collect();
    let bt: BTreeMap<u32, u32> = keys.iter().map(|&k| (k, k)).collect();

    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("rb_map", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for k in &keys {
                hits += u32::from(rb.get(black_box(k)).is_some());
            }
            hits
        });
    });
    group.bench_function("btree_map", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for k in &keys {
                hits += u32::from(bt.get(black_box(k)).is_some());
            }
            hits
        });
    });

    group.finish();
}

fn bench_map_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_churn");
    let keys = random_keys(10_000);

    group.bench_function("rb_map", |b| {
        let mut map: RbMap<u32, u32> = keys.iter().map(|&k| (k, k)).collect();
        let mut i = 0usize;
        b.iter(|| {
            let k = keys[i % keys.len()];
            map.remove(&k);
            map.insert(k, k);
            i += 1;
        });
    });

    group.finish();
}

// ============================================================================
// Heap
// ============================================================================

fn bench_heap_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_push_pop");
    let keys = random_keys(10_000);
    group.throughput(Throughput::Elements(keys.len() as u64));

    group.bench_function("priority_queue", |b| {
        b.iter(|| {
            let mut heap = PriorityQueue::with_capacity(keys.len());
            for &k in &keys {
                heap.enqueue(k);
            }
            while let Some(k) = heap.try_dequeue() {
                black_box(k);
            }
        });
    });

    group.bench_function("binary_heap", |b| {
        b.iter(|| {
            let mut heap = BinaryHeap::with_capacity(keys.len());
            for &k in &keys {
                heap.push(Reverse(k));
            }
            while let Some(k) = heap.pop() {
                black_box(k);
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_map_insert,
    bench_map_get,
    bench_map_churn,
    bench_heap_push_pop
);
criterion_main!(benches);
