// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`RTree`] container: arena ownership, raw-parts access and invariant checks.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::{InvalidPolicy, StructureError};
use crate::node::{Node, NodeId};
use crate::policy::InsertionPolicy;
use crate::types::{BoundingBox, Scalar};

/// An in-memory R-tree over 2D bounding boxes.
///
/// Items are `(box, data index)` pairs; the tree stores only the box and the
/// caller's integer reference. Nodes live in a flat arena that only grows.
pub struct RTree<T: Scalar> {
    pub(crate) policy: InsertionPolicy,
    pub(crate) root: Option<NodeId>,
    pub(crate) nodes: Vec<Node<T>>,
    pub(crate) len: usize,
}

impl<T: Scalar> Default for RTree<T> {
    fn default() -> Self {
        Self::new(InsertionPolicy::default())
    }
}

impl<T: Scalar> Clone for RTree<T> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            root: self.root,
            nodes: self.nodes.clone(),
            len: self.len,
        }
    }
}

impl<T: Scalar> RTree<T> {
    /// Create an empty tree bound to `policy`.
    pub fn new(policy: InsertionPolicy) -> Self {
        Self {
            policy,
            root: None,
            nodes: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty tree with the given fan-out bounds and the exhaustive split.
    pub fn with_children(min_children: usize, max_children: usize) -> Result<Self, InvalidPolicy> {
        InsertionPolicy::new(min_children, max_children).map(Self::new)
    }

    /// Policy applied to subsequent insertions.
    pub fn policy(&self) -> InsertionPolicy {
        self.policy
    }

    /// Replace the policy used by subsequent insertions.
    ///
    /// Existing nodes are not restructured, so the new policy must admit every
    /// node already in the arena: a node holding more than `max_children`
    /// entries is reported as [`StructureError::Overfull`] and the old policy is
    /// kept. Underfull nodes are accepted.
    pub fn set_policy(&mut self, policy: InsertionPolicy) -> Result<(), StructureError> {
        self.check_max_fan_out(policy.max_children())?;
        self.policy = policy;
        Ok(())
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the root node, if any node has been created.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node by handle.
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    /// The whole arena, indexed by [`NodeId::index`].
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// Bounds of everything stored, or `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox<T>> {
        self.root.and_then(|r| self.nodes[r.index()].bounds())
    }

    /// Number of levels from the root down to the deepest leaf; zero when no root exists.
    pub fn height(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack = vec![(root, 1_usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.nodes[id.index()].children().map(|c| (c, depth + 1)));
        }
        deepest
    }

    /// Drop every node and item. The policy is kept.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
        self.len = 0;
    }

    /// Take the arena and root handle, e.g. to serialize them.
    pub fn into_raw_parts(self) -> (Vec<Node<T>>, Option<NodeId>) {
        (self.nodes, self.root)
    }

    /// Rebuild a tree from an arena and root produced by [`RTree::into_raw_parts`]
    /// or by an external deserializer.
    ///
    /// Parent links are recomputed, then the structure is checked with
    /// [`RTree::validate`]. Nodes wider than `policy.max_children()` are
    /// rejected with [`StructureError::Overfull`], since insertion could not
    /// split them within the policy. The minimum is not checked, since
    /// bulk-loaded trees need not satisfy it.
    pub fn from_raw_parts(
        mut nodes: Vec<Node<T>>,
        root: Option<NodeId>,
        policy: InsertionPolicy,
    ) -> Result<Self, StructureError> {
        if let Some(r) = root
            && r.index() >= nodes.len()
        {
            return Err(StructureError::RootOutOfBounds(r));
        }
        for n in &mut nodes {
            n.parent = None;
        }
        for i in 0..nodes.len() {
            if nodes[i].leaf {
                continue;
            }
            let id = NodeId::from_index(i);
            let children: Vec<usize> = nodes[i].entries.iter().map(|e| e.index).collect();
            for (slot, child) in children.into_iter().enumerate() {
                let Some(node) = nodes.get_mut(child) else {
                    return Err(StructureError::DanglingChild {
                        node: id,
                        entry: slot,
                    });
                };
                if node.parent.is_some() {
                    return Err(StructureError::SharedNode(NodeId::from_index(child)));
                }
                node.parent = Some(id);
            }
        }
        // With at most one parent per node and none for the root, the walk
        // from the root cannot revisit a node.
        let len = match root {
            Some(r) if nodes[r.index()].parent.is_some() => {
                return Err(StructureError::SharedNode(r));
            }
            Some(r) => count_items(&nodes, r),
            None => 0,
        };
        let tree = Self {
            policy,
            root,
            nodes,
            len,
        };
        tree.validate()?;
        tree.check_max_fan_out(policy.max_children())?;
        Ok(tree)
    }

    /// Check the structural invariants:
    ///
    /// - every internal entry's box is the exact union of its child's entry boxes;
    /// - every node is reached from the root exactly once (no cycles, no orphans);
    /// - parent links match the entries pointing at each node;
    /// - internal nodes are non-empty and the item count matches the leaves.
    pub fn validate(&self) -> Result<(), StructureError> {
        let Some(root) = self.root else {
            if !self.nodes.is_empty() {
                return Err(StructureError::Orphan(NodeId::from_index(0)));
            }
            return self.check_len(0);
        };
        if root.index() >= self.nodes.len() {
            return Err(StructureError::RootOutOfBounds(root));
        }
        if self.nodes[root.index()].parent.is_some() {
            return Err(StructureError::ParentMismatch(root));
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut items = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if core::mem::replace(&mut seen[id.index()], true) {
                return Err(StructureError::SharedNode(id));
            }
            let node = &self.nodes[id.index()];
            if node.leaf {
                items += node.entries.len();
                continue;
            }
            if node.entries.is_empty() {
                return Err(StructureError::EmptyInternal(id));
            }
            for (slot, e) in node.entries.iter().enumerate() {
                let child = self
                    .nodes
                    .get(e.index)
                    .ok_or(StructureError::DanglingChild {
                        node: id,
                        entry: slot,
                    })?;
                if child.parent != Some(id) {
                    return Err(StructureError::ParentMismatch(e.child()));
                }
                if child.bounds() != Some(e.bbox) {
                    return Err(StructureError::LooseBounds {
                        node: id,
                        entry: slot,
                    });
                }
                stack.push(e.child());
            }
        }
        if let Some(orphan) = seen.iter().position(|s| !s) {
            return Err(StructureError::Orphan(NodeId::from_index(orphan)));
        }
        self.check_len(items)
    }

    /// [`RTree::validate`] plus the bound policy's occupancy bounds: every node
    /// holds at most `max_children` entries and every non-root node at least
    /// `min_children`.
    pub fn validate_fan_out(&self) -> Result<(), StructureError> {
        self.validate()?;
        self.check_max_fan_out(self.policy.max_children())?;
        let min = self.policy.min_children();
        for (i, node) in self.nodes.iter().enumerate() {
            let id = NodeId::from_index(i);
            let len = node.entries.len();
            if Some(id) != self.root && len < min {
                return Err(StructureError::Underfull { node: id, len });
            }
        }
        Ok(())
    }

    fn check_max_fan_out(&self, max: usize) -> Result<(), StructureError> {
        match self.nodes.iter().position(|n| n.entries.len() > max) {
            Some(i) => Err(StructureError::Overfull {
                node: NodeId::from_index(i),
                len: self.nodes[i].entries.len(),
            }),
            None => Ok(()),
        }
    }

    fn check_len(&self, found: usize) -> Result<(), StructureError> {
        if found == self.len {
            Ok(())
        } else {
            Err(StructureError::LenMismatch {
                expected: self.len,
                found,
            })
        }
    }

    pub(crate) fn push_node(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Tight union of a node's entries.
    pub(crate) fn node_bounds(&self, id: NodeId) -> BoundingBox<T> {
        self.nodes[id.index()]
            .bounds()
            .expect("only an empty root leaf has no entries")
    }
}

fn count_items<T>(nodes: &[Node<T>], root: NodeId) -> usize {
    let mut items = 0;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = &nodes[id.index()];
        if node.leaf {
            items += node.entries.len();
        } else {
            stack.extend(node.entries.iter().map(|e| e.child()));
        }
    }
    items
}

impl<T: Scalar> Debug for RTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("min_children", &self.policy.min_children())
            .field("max_children", &self.policy.max_children())
            .field("split", &self.policy.split())
            .field("arena_nodes", &self.nodes.len())
            .field("len", &self.len)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// R-tree with i64 coordinates and i128 metrics.
pub type RTreeI64 = RTree<i64>;

/// R-tree with f32 coordinates and f64 metrics.
pub type RTreeF32 = RTree<f32>;

/// R-tree with f64 coordinates and f64 metrics.
pub type RTreeF64 = RTree<f64>;
