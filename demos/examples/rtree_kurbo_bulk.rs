// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk loading kurbo rectangles and comparing tree shapes.
//!
//! Build the same layout incrementally, with the binary bulk loader and with the
//! packed loader, then check that all three agree on a query.
//!
//! Run:
//! - `cargo run -p understory_rtree_demos --example rtree_kurbo_bulk`

use kurbo::Rect;
use understory_rtree::{BoundingBox, InsertionPolicy, RTreeF64};

fn main() {
    let rects: Vec<Rect> = (0..400)
        .map(|i| {
            let (x, y) = (f64::from(i % 20) * 30.0, f64::from(i / 20) * 30.0);
            Rect::new(x, y, x + 25.0, y + 25.0)
        })
        .collect();
    let items = || {
        rects
            .iter()
            .map(|r| BoundingBox::from(*r))
            .zip(0..)
            .collect::<Vec<_>>()
    };

    let policy = InsertionPolicy::new(3, 8).expect("3 <= 8 / 2");
    let mut incremental = RTreeF64::new(policy);
    incremental.extend(items());
    let binary = RTreeF64::bulk_load(items());
    let packed = RTreeF64::bulk_load_packed(items(), policy);

    let viewport = Rect::new(100.0, 100.0, 220.0, 160.0);
    for (name, tree) in [
        ("incremental", &incremental),
        ("binary bulk", &binary),
        ("packed bulk", &packed),
    ] {
        let mut hits: Vec<_> = tree.query(viewport.into()).collect();
        hits.sort_unstable();
        println!(
            "{name:>12}: {} nodes, height {}, {} hits in {viewport:?}",
            tree.nodes().len(),
            tree.height(),
            hits.len()
        );
        if let Some(bounds) = tree.bounds() {
            println!("{:>12}  bounds {:?}", "", Rect::from(bounds));
        }
    }
}
