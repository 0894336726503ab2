// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

use crate::node::NodeId;

/// An [`InsertionPolicy`](crate::InsertionPolicy) whose fan-out bounds cannot be honoured.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidPolicy {
    /// `min_children` exceeds half of `max_children`, so an overfull node
    /// cannot always be split into two groups that both meet the minimum.
    #[error("min_children ({min}) must be at most half of max_children ({max})")]
    MinChildrenTooLarge {
        /// Requested minimum occupancy.
        min: usize,
        /// Requested maximum occupancy.
        max: usize,
    },
    /// A node must hold at least two entries to be split into two non-empty halves.
    #[error("max_children must be at least 2, got {max}")]
    MaxChildrenTooSmall {
        /// Requested maximum occupancy.
        max: usize,
    },
    /// The exhaustive split enumerates `2^max_children` partitions.
    #[error("exhaustive split supports at most {limit} children per node, got {max}")]
    ExhaustiveFanOutTooLarge {
        /// Requested maximum occupancy.
        max: usize,
        /// Largest fan-out accepted with the exhaustive split.
        limit: usize,
    },
}

/// A structural invariant violated by a tree's node arena.
///
/// Returned by [`RTree::validate`](crate::RTree::validate),
/// [`RTree::validate_fan_out`](crate::RTree::validate_fan_out),
/// [`RTree::set_policy`](crate::RTree::set_policy) and
/// [`RTree::from_raw_parts`](crate::RTree::from_raw_parts).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum StructureError {
    /// The root handle does not address a node in the arena.
    #[error("root {0:?} is out of bounds")]
    RootOutOfBounds(NodeId),
    /// An internal entry points outside the arena.
    #[error("entry {entry} of {node:?} points at a missing node")]
    DanglingChild {
        /// Node holding the entry.
        node: NodeId,
        /// Position of the entry within the node.
        entry: usize,
    },
    /// An internal entry's box is not the exact union of its child's entries.
    #[error("entry {entry} of {node:?} is not the tight union of its child")]
    LooseBounds {
        /// Node holding the entry.
        node: NodeId,
        /// Position of the entry within the node.
        entry: usize,
    },
    /// A node is reachable from the root along more than one path, or lies on a cycle.
    #[error("{0:?} is reachable more than once")]
    SharedNode(NodeId),
    /// A node in the arena is not reachable from the root.
    #[error("{0:?} is not reachable from the root")]
    Orphan(NodeId),
    /// An internal node has no entries.
    #[error("internal {0:?} has no entries")]
    EmptyInternal(NodeId),
    /// A node's parent link disagrees with the entry pointing at it.
    #[error("{0:?} has a parent link that disagrees with the tree")]
    ParentMismatch(NodeId),
    /// The cached item count disagrees with the number of leaf entries.
    #[error("tree reports {expected} items but its leaves hold {found}")]
    LenMismatch {
        /// Count recorded by the tree.
        expected: usize,
        /// Count found by walking the leaves.
        found: usize,
    },
    /// A node holds more than `max_children` entries.
    #[error("{node:?} holds {len} entries, more than the maximum")]
    Overfull {
        /// Offending node.
        node: NodeId,
        /// Its entry count.
        len: usize,
    },
    /// A non-root node holds fewer than `min_children` entries.
    #[error("{node:?} holds {len} entries, fewer than the minimum")]
    Underfull {
        /// Offending node.
        node: NodeId,
        /// Its entry count.
        len: usize,
    },
}
