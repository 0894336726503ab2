// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out bounds and split strategy used by incremental insertion.

use crate::error::InvalidPolicy;

/// Largest `max_children` accepted together with [`SplitStrategy::Exhaustive`].
///
/// The exhaustive split inspects `2^max_children` bit patterns per overflow,
/// which stays in the tens of thousands at this bound.
pub const EXHAUSTIVE_MAX_CHILDREN: usize = 16;

/// How an overfull node's entries are partitioned into two nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SplitStrategy {
    /// Try every two-group partition and keep the one with the smallest total
    /// area. Exact, but `O(2^k)` in the node size.
    #[default]
    Exhaustive,
    /// Sort entries by centre along each axis and try every cut point, keeping
    /// the one with the smallest total area. `O(k log k)`; suited to wide nodes.
    Sweep,
}

/// Fan-out bounds governing incremental insertion.
///
/// Validated on construction: once built, a policy can always be honoured by
/// the split step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InsertionPolicy {
    min_children: usize,
    max_children: usize,
    split: SplitStrategy,
}

impl InsertionPolicy {
    /// Create a policy using the exhaustive split.
    ///
    /// Fails if `min_children > max_children / 2` or `max_children < 2`.
    ///
    /// ```
    /// use understory_rtree::InsertionPolicy;
    ///
    /// assert!(InsertionPolicy::new(2, 4).is_ok());
    /// assert!(InsertionPolicy::new(3, 4).is_err());
    /// ```
    pub fn new(min_children: usize, max_children: usize) -> Result<Self, InvalidPolicy> {
        Self::with_split(min_children, max_children, SplitStrategy::Exhaustive)
    }

    /// Create a policy with an explicit split strategy.
    pub fn with_split(
        min_children: usize,
        max_children: usize,
        split: SplitStrategy,
    ) -> Result<Self, InvalidPolicy> {
        if max_children < 2 {
            return Err(InvalidPolicy::MaxChildrenTooSmall { max: max_children });
        }
        if min_children > max_children / 2 {
            return Err(InvalidPolicy::MinChildrenTooLarge {
                min: min_children,
                max: max_children,
            });
        }
        if split == SplitStrategy::Exhaustive && max_children > EXHAUSTIVE_MAX_CHILDREN {
            return Err(InvalidPolicy::ExhaustiveFanOutTooLarge {
                max: max_children,
                limit: EXHAUSTIVE_MAX_CHILDREN,
            });
        }
        Ok(Self {
            min_children,
            max_children,
            split,
        })
    }

    /// Minimum entries in every non-root node.
    pub const fn min_children(&self) -> usize {
        self.min_children
    }

    /// Maximum entries in any node.
    pub const fn max_children(&self) -> usize {
        self.max_children
    }

    /// Split strategy applied on overflow.
    pub const fn split(&self) -> SplitStrategy {
        self.split
    }
}

impl Default for InsertionPolicy {
    fn default() -> Self {
        Self {
            min_children: 4,
            max_children: 8,
            split: SplitStrategy::Exhaustive,
        }
    }
}
