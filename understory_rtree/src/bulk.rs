// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot tree construction from a complete batch of items.
//!
//! [`RTree::bulk_load`] recursively halves the batch along its wider axis and
//! produces a balanced binary tree. It ignores fan-out policy entirely.
//! [`RTree::bulk_load_packed`] is the sort-tile-recursive generalisation that
//! packs up to `max_children` entries per node.

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Entry, Node, NodeId, union_of};
use crate::policy::InsertionPolicy;
use crate::tree::RTree;
use crate::types::{BoundingBox, Scalar, cmp_t};

impl<T: Scalar> RTree<T> {
    /// Build a tree from `(box, data index)` pairs by recursive sort-and-split.
    ///
    /// Batches of at most two items become a leaf. Larger batches are stably sorted
    /// by `min + max` (twice the box centre, so integer centres do not round) along
    /// the axis with the larger extent (y on ties), cut in half at
    /// `len / 2`, and each half is built recursively under a new internal node with
    /// two entries. Every node of the result therefore holds at most two entries.
    ///
    /// The tree is bound to the default [`InsertionPolicy`] for later insertions.
    /// An empty batch gives an empty tree.
    pub fn bulk_load<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (BoundingBox<T>, usize)>,
    {
        let mut entries: Vec<Entry<T>> = items
            .into_iter()
            .map(|(bbox, data)| Entry::new(bbox, data))
            .collect();
        let mut tree = Self::default();
        if entries.is_empty() {
            return tree;
        }
        tree.len = entries.len();
        let root = tree.build_halves(&mut entries);
        tree.root = Some(root);
        log::debug!(
            "bulk loaded {} items into {} nodes",
            tree.len,
            tree.nodes.len()
        );
        tree
    }

    fn build_halves(&mut self, items: &mut [Entry<T>]) -> NodeId {
        if items.len() <= 2 {
            return self.push_node(Node::leaf(items.to_vec()));
        }
        let bounds = union_of(items).expect("batch has more than two items");
        if bounds.width() > bounds.height() {
            items.sort_by(|a, b| cmp_t(&a.bbox.center_key_x(), &b.bbox.center_key_x()));
        } else {
            items.sort_by(|a, b| cmp_t(&a.bbox.center_key_y(), &b.bbox.center_key_y()));
        }
        let mid = items.len() / 2;
        let (lo, hi) = items.split_at_mut(mid);
        let left = self.build_halves(lo);
        let right = self.build_halves(hi);
        let entries = vec![
            Entry::new(self.node_bounds(left), left.index()),
            Entry::new(self.node_bounds(right), right.index()),
        ];
        let id = self.push_node(Node::internal(entries));
        self.adopt_children(id);
        id
    }

    /// Build a packed tree with sort-tile-recursive tiling.
    ///
    /// Each level is sorted by centre x, cut into roughly `sqrt(groups)` vertical
    /// slices, and each slice is sorted by centre y and cut into evenly sized groups
    /// of at most `policy.max_children()` entries. Levels are stacked until a single
    /// root remains. The last slice of a level may hold fewer than
    /// `policy.min_children()` entries per node.
    pub fn bulk_load_packed<I>(items: I, policy: InsertionPolicy) -> Self
    where
        I: IntoIterator<Item = (BoundingBox<T>, usize)>,
    {
        let mut entries: Vec<Entry<T>> = items
            .into_iter()
            .map(|(bbox, data)| Entry::new(bbox, data))
            .collect();
        let mut tree = Self::new(policy);
        if entries.is_empty() {
            return tree;
        }
        tree.len = entries.len();
        let max = policy.max_children();
        let mut level = tree.pack_level(&mut entries, max, true);
        while level.len() > 1 {
            let mut parents: Vec<Entry<T>> = level
                .iter()
                .map(|&id| Entry::new(tree.node_bounds(id), id.index()))
                .collect();
            level = tree.pack_level(&mut parents, max, false);
        }
        tree.root = level.first().copied();
        log::debug!(
            "packed {} items into {} nodes, height {}",
            tree.len,
            tree.nodes.len(),
            tree.height()
        );
        tree
    }

    fn pack_level(&mut self, entries: &mut [Entry<T>], max: usize, leaf: bool) -> Vec<NodeId> {
        let groups = entries.len().div_ceil(max);
        let mut slices = 1_usize;
        while slices * slices < groups {
            slices += 1;
        }
        entries.sort_by(|a, b| cmp_t(&a.bbox.center_key_x(), &b.bbox.center_key_x()));
        let slice_len = groups.div_ceil(slices) * max;

        let mut out = Vec::with_capacity(groups);
        for slice in entries.chunks_mut(slice_len) {
            slice.sort_by(|a, b| cmp_t(&a.bbox.center_key_y(), &b.bbox.center_key_y()));
            let k = slice.len().div_ceil(max);
            let (base, extra) = (slice.len() / k, slice.len() % k);
            let mut start = 0;
            for g in 0..k {
                let end = start + base + usize::from(g < extra);
                let chunk = slice[start..end].to_vec();
                start = end;
                let id = if leaf {
                    self.push_node(Node::leaf(chunk))
                } else {
                    let id = self.push_node(Node::internal(chunk));
                    self.adopt_children(id);
                    id
                };
                out.push(id);
            }
        }
        out
    }
}

impl<T: Scalar> FromIterator<(BoundingBox<T>, usize)> for RTree<T> {
    fn from_iter<I: IntoIterator<Item = (BoundingBox<T>, usize)>>(iter: I) -> Self {
        Self::bulk_load(iter)
    }
}
