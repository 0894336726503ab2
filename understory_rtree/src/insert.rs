// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental insertion (Guttman, 1984).
//!
//! Each insertion descends to the leaf needing the least enlargement, appends the
//! item, widens every ancestor entry on the way back up, and then splits overfull
//! nodes bottom-up. When the root itself splits, a new root is grown above the two
//! halves. Parent back-references in the arena make the upward walk `O(height)`.

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Entry, Node, NodeId};
use crate::split::partition;
use crate::tree::RTree;
use crate::types::{BoundingBox, Scalar};

impl<T: Scalar> RTree<T> {
    /// Insert an item under the tree's bound [`InsertionPolicy`](crate::InsertionPolicy).
    ///
    /// `data` is an opaque caller reference returned by searches. Boxes must satisfy
    /// `min <= max` on both axes; this is not checked.
    ///
    /// ```
    /// use understory_rtree::{BoundingBox, RTreeF64};
    ///
    /// let mut tree = RTreeF64::with_children(2, 4).unwrap();
    /// tree.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0);
    /// tree.insert(BoundingBox::new(5.0, 5.0, 6.0, 6.0), 1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, bbox: BoundingBox<T>, data: usize) {
        debug_assert!(bbox.is_valid(), "inverted or NaN bounding box: {bbox:?}");
        if self.root.is_none() {
            let id = self.push_node(Node::leaf(Vec::new()));
            self.root = Some(id);
        }

        let leaf = self.choose_leaf(&bbox);
        self.nodes[leaf.index()].entries.push(Entry::new(bbox, data));
        self.len += 1;
        self.widen_ancestors(leaf, &bbox);

        if self.nodes[leaf.index()].entries.len() <= self.policy.max_children() {
            return;
        }
        let sibling = self.split_node(leaf);
        if let Some((left, right)) = self.adjust_tree(leaf, sibling) {
            self.grow_root(left, right);
        }
    }

    /// Walk down from the root, at each internal node following the entry that
    /// needs the least enlargement to cover `bbox`, ties going to the smaller area.
    fn choose_leaf(&self, bbox: &BoundingBox<T>) -> NodeId {
        let mut current = self.root.expect("insert creates a root first");
        loop {
            let node = &self.nodes[current.index()];
            if node.leaf {
                log::trace!("chose leaf {current:?} for {bbox:?}");
                return current;
            }
            let mut best = 0;
            let mut best_cost = node.entries[0].bbox.enlargement(bbox);
            let mut best_area = node.entries[0].bbox.area();
            for (i, e) in node.entries.iter().enumerate().skip(1) {
                let cost = e.bbox.enlargement(bbox);
                let area = e.bbox.area();
                if cost < best_cost || (cost == best_cost && area < best_area) {
                    best = i;
                    best_cost = cost;
                    best_area = area;
                }
            }
            current = node.entries[best].child();
        }
    }

    /// Grow the entry pointing at each ancestor of `from` to also cover `bbox`.
    fn widen_ancestors(&mut self, from: NodeId, bbox: &BoundingBox<T>) {
        let mut current = from;
        while let Some(parent) = self.nodes[current.index()].parent {
            let slot = self.slot_in_parent(parent, current);
            let e = &mut self.nodes[parent.index()].entries[slot];
            e.bbox = e.bbox.union(bbox);
            current = parent;
        }
    }

    /// Split an overfull node in place: group A stays in `id`, group B moves to a
    /// new node of the same kind whose handle is returned.
    fn split_node(&mut self, id: NodeId) -> NodeId {
        let node = &mut self.nodes[id.index()];
        let leaf = node.leaf;
        let entries = core::mem::take(&mut node.entries);
        debug_assert_eq!(
            entries.len(),
            self.policy.max_children() + 1,
            "nodes overflow one entry at a time"
        );
        let (a, b) = partition(
            entries,
            self.policy.min_children(),
            self.policy.split(),
        );
        log::trace!(
            "split {} {id:?} into {} + {} entries",
            if leaf { "leaf" } else { "internal node" },
            a.len(),
            b.len()
        );
        self.nodes[id.index()].entries = a;

        let sibling = self.push_node(Node {
            leaf,
            entries: b,
            parent: None,
        });
        if !leaf {
            self.adopt_children(sibling);
        }
        sibling
    }

    /// Propagate a split from `node` (with new sibling `split`) towards the root.
    ///
    /// Returns the two halves of the old root if the split reached it.
    fn adjust_tree(&mut self, mut node: NodeId, mut split: NodeId) -> Option<(NodeId, NodeId)> {
        loop {
            let Some(parent) = self.nodes[node.index()].parent else {
                return Some((node, split));
            };
            let slot = self.slot_in_parent(parent, node);
            let shrunk = self.node_bounds(node);
            self.nodes[parent.index()].entries[slot].bbox = shrunk;

            let sibling_bbox = self.node_bounds(split);
            self.nodes[parent.index()]
                .entries
                .push(Entry::new(sibling_bbox, split.index()));
            self.nodes[split.index()].parent = Some(parent);

            if self.nodes[parent.index()].entries.len() <= self.policy.max_children() {
                // The parent still covers exactly what it covered before the split,
                // so nothing above it changes.
                return None;
            }
            split = self.split_node(parent);
            node = parent;
        }
    }

    /// Make a new root holding exactly the two halves of the old one.
    fn grow_root(&mut self, left: NodeId, right: NodeId) {
        let entries = vec![
            Entry::new(self.node_bounds(left), left.index()),
            Entry::new(self.node_bounds(right), right.index()),
        ];
        let root = self.push_node(Node::internal(entries));
        self.nodes[left.index()].parent = Some(root);
        self.nodes[right.index()].parent = Some(root);
        self.root = Some(root);
        log::debug!(
            "grew root {root:?} over {left:?} and {right:?}; height is now {}",
            self.height()
        );
    }

    /// Point every child of internal node `id` back at it.
    pub(crate) fn adopt_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.nodes[id.index()].children().collect();
        for c in children {
            self.nodes[c.index()].parent = Some(id);
        }
    }

    fn slot_in_parent(&self, parent: NodeId, child: NodeId) -> usize {
        self.nodes[parent.index()]
            .slot_of(child)
            .expect("parent link points at a node holding the child")
    }
}

impl<T: Scalar> Extend<(BoundingBox<T>, usize)> for RTree<T> {
    fn extend<I: IntoIterator<Item = (BoundingBox<T>, usize)>>(&mut self, iter: I) {
        for (bbox, data) in iter {
            self.insert(bbox, data);
        }
    }
}
