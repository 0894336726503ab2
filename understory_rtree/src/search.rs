// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap search.
//!
//! Traversal is depth-first from the root; an entry whose box misses the query
//! prunes its whole subtree. Results come in no particular order.

use alloc::vec::Vec;
use core::ops::ControlFlow;

use crate::node::NodeId;
use crate::tree::RTree;
use crate::types::{BoundingBox, Scalar};

impl<T: Scalar> RTree<T> {
    /// Call `f` with the data index of every item whose box overlaps `query`.
    ///
    /// ```
    /// use understory_rtree::{BoundingBox, RTreeF64};
    ///
    /// let mut tree = RTreeF64::with_children(2, 4).unwrap();
    /// tree.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0);
    /// tree.insert(BoundingBox::new(5.0, 5.0, 6.0, 6.0), 1);
    /// tree.insert(BoundingBox::new(0.5, 0.5, 1.5, 1.5), 2);
    ///
    /// let mut hits = Vec::new();
    /// tree.search(BoundingBox::new(0.0, 0.0, 2.0, 2.0), |i| hits.push(i));
    /// hits.sort();
    /// assert_eq!(hits, [0, 2]);
    /// ```
    pub fn search<F: FnMut(usize)>(&self, query: BoundingBox<T>, mut f: F) {
        let _ = self.try_search(query, |i| {
            f(i);
            ControlFlow::<()>::Continue(())
        });
    }

    /// Like [`RTree::search`], but `f` may stop the traversal by returning
    /// [`ControlFlow::Break`]; no further calls happen after a break, and the
    /// break value is returned.
    pub fn try_search<B, F>(&self, query: BoundingBox<T>, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(usize) -> ControlFlow<B>,
    {
        match self.root {
            Some(root) => self.visit(root, &query, &mut f),
            None => ControlFlow::Continue(()),
        }
    }

    fn visit<B, F>(&self, id: NodeId, query: &BoundingBox<T>, f: &mut F) -> ControlFlow<B>
    where
        F: FnMut(usize) -> ControlFlow<B>,
    {
        let node = &self.nodes[id.index()];
        for e in node.entries.iter().filter(|e| e.bbox.overlaps(query)) {
            if node.leaf {
                f(e.index)?;
            } else {
                self.visit(e.child(), query, f)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Lazily iterate over the data indices of items overlapping `query`.
    pub fn query(&self, query: BoundingBox<T>) -> Query<'_, T> {
        Query {
            tree: self,
            query,
            stack: self.root.map(|r| (r, 0)).into_iter().collect(),
        }
    }
}

/// Iterator returned by [`RTree::query`].
#[derive(Debug)]
pub struct Query<'a, T: Scalar> {
    tree: &'a RTree<T>,
    query: BoundingBox<T>,
    /// Nodes being walked, each with the next entry position to look at.
    stack: Vec<(NodeId, usize)>,
}

impl<T: Scalar> Iterator for Query<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some((id, pos)) = self.stack.last_mut() {
            let node = &self.tree.nodes[id.index()];
            let Some(offset) = node.entries[*pos..]
                .iter()
                .position(|e| e.bbox.overlaps(&self.query))
            else {
                self.stack.pop();
                continue;
            };
            let e = node.entries[*pos + offset];
            *pos += offset + 1;
            if node.leaf {
                return Some(e.index);
            }
            self.stack.push((e.child(), 0));
        }
        None
    }
}
