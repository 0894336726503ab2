// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena node types.
//!
//! A tree is a flat `Vec` of [`Node`]s addressed by [`NodeId`]. Each node holds an
//! ordered list of [`Entry`]s; in a leaf an entry's `index` is the caller's data
//! index, in an internal node it is the index of a child node.

use alloc::vec::Vec;

use crate::types::{BoundingBox, Scalar};

/// Handle to a node in a tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw arena position.
    pub const fn from_index(i: usize) -> Self {
        Self(i)
    }

    /// Position of the node in the arena.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A box paired with either a child node index or a caller data index.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry<T> {
    /// Tight bounds of whatever `index` refers to.
    pub bbox: BoundingBox<T>,
    /// Child node index (internal nodes) or caller data index (leaves).
    pub index: usize,
}

impl<T> Entry<T> {
    /// Create an entry.
    pub const fn new(bbox: BoundingBox<T>, index: usize) -> Self {
        Self { bbox, index }
    }

    /// The child node this entry points at, when read from an internal node.
    pub const fn child(&self) -> NodeId {
        NodeId(self.index)
    }
}

/// A node of the tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<T> {
    pub(crate) leaf: bool,
    pub(crate) entries: Vec<Entry<T>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) parent: Option<NodeId>,
}

impl<T> Node<T> {
    /// A leaf holding caller data entries.
    pub fn leaf(entries: Vec<Entry<T>>) -> Self {
        Self {
            leaf: true,
            entries,
            parent: None,
        }
    }

    /// An internal node whose entries point at child nodes.
    pub fn internal(entries: Vec<Entry<T>>) -> Self {
        Self {
            leaf: false,
            entries,
            parent: None,
        }
    }

    /// Whether the entries reference caller data.
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// The node's entries, in insertion/partition order.
    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the node has no entries. Only an empty tree's root leaf can be empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The node one level up, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles of an internal node; empty for leaves.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        let internal = !self.leaf;
        self.entries
            .iter()
            .filter(move |_| internal)
            .map(Entry::child)
    }

    /// Position of the entry pointing at `child`.
    pub(crate) fn slot_of(&self, child: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.index == child.index())
    }
}

impl<T: Scalar> Node<T> {
    /// Tight union of the node's entry boxes, or `None` if it has no entries.
    pub fn bounds(&self) -> Option<BoundingBox<T>> {
        union_of(&self.entries)
    }
}

/// Tight union of a run of entries.
pub(crate) fn union_of<T: Scalar>(entries: &[Entry<T>]) -> Option<BoundingBox<T>> {
    let mut it = entries.iter();
    let first = it.next()?.bbox;
    Some(it.fold(first, |acc, e| acc.union(&e.bbox)))
}
