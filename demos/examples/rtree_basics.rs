// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree basics.
//!
//! Insert a few boxes one at a time, query them, and stop a search early.
//!
//! Run:
//! - `cargo run -p understory_rtree_demos --example rtree_basics`

use core::ops::ControlFlow;

use understory_rtree::{BoundingBox, RTreeF64};

fn main() {
    // Payloads live outside the tree; the tree only stores their positions.
    let names = ["a", "b", "c", "d", "e"];
    let boxes = [
        BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        BoundingBox::new(5.0, 5.0, 6.0, 6.0),
        BoundingBox::new(0.5, 0.5, 1.5, 1.5),
        BoundingBox::point(2.0, 2.0),
        BoundingBox::new(-3.0, 4.0, -1.0, 8.0),
    ];

    let mut tree = RTreeF64::with_children(2, 4).expect("2 <= 4 / 2");
    for (i, b) in boxes.iter().enumerate() {
        tree.insert(*b, i);
    }
    println!("{tree:?}, height {}", tree.height());

    let query = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
    let mut hits = Vec::new();
    tree.search(query, |i| hits.push(names[i]));
    hits.sort_unstable();
    println!("overlapping {query:?}: {hits:?}");

    // Only the first hit is needed.
    let first = tree.try_search(query, ControlFlow::Break);
    println!("first hit: {first:?}");
}
