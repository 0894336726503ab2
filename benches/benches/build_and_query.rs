// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{BoundingBox, InsertionPolicy, RTreeF64, SplitStrategy};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<BoundingBox<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(BoundingBox::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<BoundingBox<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(BoundingBox::<f64>::from_xywh(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn items(rects: &[BoundingBox<f64>]) -> Vec<(BoundingBox<f64>, usize)> {
    rects.iter().copied().zip(0..).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[32usize, 64] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        for (name, policy) in [
            ("exhaustive_4_8", InsertionPolicy::new(4, 8).unwrap()),
            ("exhaustive_2_12", InsertionPolicy::new(2, 12).unwrap()),
            (
                "sweep_8_24",
                InsertionPolicy::with_split(8, 24, SplitStrategy::Sweep).unwrap(),
            ),
        ] {
            group.bench_function(format!("{name}_n{n}"), |b| {
                b.iter_batched(
                    || RTreeF64::new(policy),
                    |mut tree| {
                        tree.extend(items(&rects));
                        black_box(tree.len());
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_load");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("binary_n{n}"), |b| {
            b.iter_batched(
                || items(&rects),
                |entries| black_box(RTreeF64::bulk_load(entries).len()),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("packed_n{n}"), |b| {
            b.iter_batched(
                || items(&rects),
                |entries| {
                    black_box(RTreeF64::bulk_load_packed(entries, InsertionPolicy::default()).len())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rects = gen_clustered_rects(40, 250, 300.0);
    let query = BoundingBox::<f64>::from_xywh(500.0, 500.0, 400.0, 400.0);
    let mut incremental = RTreeF64::default();
    incremental.extend(items(&rects));
    let binary = RTreeF64::bulk_load(items(&rects));
    let packed = RTreeF64::bulk_load_packed(items(&rects), InsertionPolicy::default());
    for (name, tree) in [
        ("incremental", &incremental),
        ("bulk_binary", &binary),
        ("bulk_packed", &packed),
    ] {
        group.bench_function(format!("{name}_callback"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                tree.search(query, |_| hits += 1);
                black_box(hits)
            })
        });
        group.bench_function(format!("{name}_iter"), |b| {
            b.iter(|| black_box(tree.query(query).count()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_bulk, bench_query);
criterion_main!(benches);
