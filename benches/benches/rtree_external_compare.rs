// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Each construction strategy of this crate against `rstar`, on the same
//! clustered data set and query window.

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{BoundingBox, InsertionPolicy, RTreeF64, SplitStrategy};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

/// Small boxes around a handful of centres, laid out deterministically.
fn clustered(n: usize) -> Vec<BoundingBox<f64>> {
    let centres = [(50.0, 50.0), (400.0, 120.0), (220.0, 380.0), (600.0, 600.0)];
    (0..n)
        .map(|i| {
            let (cx, cy) = centres[i % centres.len()];
            let t = i as f64 * 0.618_034;
            let r = (i % 97) as f64;
            let x = cx + r * t.cos();
            let y = cy + r * t.sin();
            BoundingBox::from_xywh(x, y, 1.0 + (i % 5) as f64, 1.0 + (i % 3) as f64)
        })
        .collect()
}

fn window() -> BoundingBox<f64> {
    BoundingBox::new(150.0, 80.0, 450.0, 400.0)
}

fn ours(name: &str) -> Box<dyn Fn(&[BoundingBox<f64>]) -> RTreeF64> {
    let incremental = |policy: InsertionPolicy| {
        move |boxes: &[BoundingBox<f64>]| {
            let mut tree = RTreeF64::new(policy);
            tree.extend(boxes.iter().copied().zip(0..));
            tree
        }
    };
    match name {
        "exhaustive_4_8" => Box::new(incremental(InsertionPolicy::default())),
        "sweep_8_24" => Box::new(incremental(
            InsertionPolicy::with_split(8, 24, SplitStrategy::Sweep).unwrap(),
        )),
        "bulk_binary" => Box::new(|boxes: &[BoundingBox<f64>]| {
            RTreeF64::bulk_load(boxes.iter().copied().zip(0..))
        }),
        _ => Box::new(|boxes: &[BoundingBox<f64>]| {
            RTreeF64::bulk_load_packed(boxes.iter().copied().zip(0..), InsertionPolicy::default())
        }),
    }
}

fn to_rstar(boxes: &[BoundingBox<f64>]) -> Vec<Rectangle<[f64; 2]>> {
    boxes
        .iter()
        .map(|b| Rectangle::from_corners([b.min_x, b.min_y], [b.max_x, b.max_y]))
        .collect()
}

fn bench_build_then_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_vs_rstar_build_query");
    let q = window();
    let envelope = AABB::from_corners([q.min_x, q.min_y], [q.max_x, q.max_y]);
    for &n in &[4_096_usize, 16_384] {
        let boxes = clustered(n);
        group.throughput(Throughput::Elements(n as u64));

        for name in ["exhaustive_4_8", "sweep_8_24", "bulk_binary", "bulk_packed"] {
            let build = ours(name);
            group.bench_function(format!("understory_{name}_n{n}"), |b| {
                b.iter(|| {
                    let tree = build(&boxes);
                    black_box(tree.query(q).count())
                });
            });
        }

        group.bench_function(format!("rstar_insert_n{n}"), |b| {
            b.iter_batched(
                || to_rstar(&boxes),
                |rects| {
                    let mut tree = RTree::new();
                    for r in rects {
                        tree.insert(r);
                    }
                    black_box(tree.locate_in_envelope_intersecting(&envelope).count())
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("rstar_bulk_n{n}"), |b| {
            b.iter_batched(
                || to_rstar(&boxes),
                |rects| {
                    let tree = RTree::bulk_load(rects);
                    black_box(tree.locate_in_envelope_intersecting(&envelope).count())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_query_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_vs_rstar_query");
    let boxes = clustered(16_384);
    let q = window();
    let envelope = AABB::from_corners([q.min_x, q.min_y], [q.max_x, q.max_y]);

    for name in ["exhaustive_4_8", "sweep_8_24", "bulk_binary", "bulk_packed"] {
        let tree = ours(name)(&boxes);
        group.bench_function(format!("understory_{name}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                tree.search(q, |_| hits += 1);
                black_box(hits)
            });
        });
    }

    let tree = RTree::bulk_load(to_rstar(&boxes));
    group.bench_function("rstar_bulk", |b| {
        b.iter(|| black_box(tree.locate_in_envelope_intersecting(&envelope).count()));
    });
    group.finish();
}

criterion_group!(benches, bench_build_then_query, bench_query_only);
criterion_main!(benches);
