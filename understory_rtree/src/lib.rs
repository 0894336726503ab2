// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory R-tree: an arena-backed 2D R-tree over axis-aligned bounding boxes.
//!
//! - Store `(bounding box, data index)` pairs. The data index is an opaque `usize`
//!   the caller maps to its own payloads; the tree never stores payloads.
//! - Build incrementally with Guttman's insertion algorithm, or in one pass with
//!   a sort-and-split bulk loader.
//! - Query every item whose box overlaps a query box, via callback, early-exit
//!   callback, or lazy iterator.
//!
//! It is generic over the scalar type `T` (`f32`, `f64`, `i64`) and computes areas in a
//! widened accumulator (`f32`→`f64`, `i64`→`i128`).
//!
//! # Example
//!
//! ```rust
//! use understory_rtree::{BoundingBox, RTreeF64};
//!
//! // Nodes hold between 2 and 4 entries.
//! let mut tree = RTreeF64::with_children(2, 4).unwrap();
//! tree.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0);
//! tree.insert(BoundingBox::new(5.0, 5.0, 6.0, 6.0), 1);
//! tree.insert(BoundingBox::new(0.5, 0.5, 1.5, 1.5), 2);
//!
//! let mut hits: Vec<_> = tree.query(BoundingBox::new(0.0, 0.0, 2.0, 2.0)).collect();
//! hits.sort();
//! assert_eq!(hits, [0, 2]);
//! ```
//!
//! Bulk loading builds the whole tree from a batch:
//!
//! ```rust
//! use understory_rtree::{BoundingBox, RTreeI64};
//!
//! let items = (0..100).map(|i| (BoundingBox::<i64>::from_xywh(i * 10, 0, 5, 5), i as usize));
//! let tree = RTreeI64::bulk_load(items);
//! assert_eq!(tree.query(BoundingBox::new(0, 0, 20, 5)).count(), 3);
//! ```
//!
//! ## Structure
//!
//! The tree is a flat arena of [`Node`]s addressed by [`NodeId`]. Every node holds
//! an ordered list of [`Entry`]s; an internal entry's box is always the exact union
//! of its child's entry boxes. Nodes are never freed: insertion only appends, so
//! after heavy churn rebuilding with [`RTree::bulk_load`] compacts the arena.
//! The arena is public through [`RTree::nodes`] and [`RTree::into_raw_parts`] so
//! callers can persist it in any format and restore it with
//! [`RTree::from_raw_parts`].
//!
//! ## Split strategies
//!
//! [`SplitStrategy::Exhaustive`] (the default) tries every two-group partition of an
//! overfull node and keeps the one with the smallest total area. It costs `O(2^k)`
//! per split and is limited to [`EXHAUSTIVE_MAX_CHILDREN`]. For wide nodes use
//! [`SplitStrategy::Sweep`], which sorts along each axis and tries every cut.
//!
//! ## Bulk loading and fan-out
//!
//! [`RTree::bulk_load`] ignores the policy and always produces binary nodes.
//! [`RTree::bulk_load_packed`] packs up to `max_children` entries per node instead.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs and `min <= max` on both axes. Debug builds assert
//! this on insertion.

#![no_std]

extern crate alloc;

mod bulk;
pub mod error;
mod insert;
pub mod node;
pub mod policy;
pub mod search;
mod split;
pub mod tree;
pub mod types;

pub use error::{InvalidPolicy, StructureError};
pub use node::{Entry, Node, NodeId};
pub use policy::{EXHAUSTIVE_MAX_CHILDREN, InsertionPolicy, SplitStrategy};
pub use search::Query;
pub use tree::{RTree, RTreeF32, RTreeF64, RTreeI64};
pub use types::{BoundingBox, Scalar};
