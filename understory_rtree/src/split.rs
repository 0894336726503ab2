// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split selector: partitions an overfull node's entries into two groups.
//!
//! Both strategies minimise `area(A) + area(B)` subject to each group holding at
//! least `min_children` entries. Group A stays in the overflowing node and group B
//! moves to a new sibling; both keep the entries' original relative order.

use alloc::vec;
use alloc::vec::Vec;

use crate::node::Entry;
use crate::policy::SplitStrategy;
use crate::types::{BoundingBox, Scalar, ScalarAcc, cmp_t};

/// Partition `entries` into `(group_a, group_b)`.
pub(crate) fn partition<T: Scalar>(
    entries: Vec<Entry<T>>,
    min_children: usize,
    strategy: SplitStrategy,
) -> (Vec<Entry<T>>, Vec<Entry<T>>) {
    debug_assert!(entries.len() >= 2, "split requires overflow");
    let in_b = match strategy {
        SplitStrategy::Exhaustive => exhaustive(&entries, min_children),
        SplitStrategy::Sweep => sweep(&entries, min_children),
    };
    let mut a = Vec::with_capacity(entries.len());
    let mut b = Vec::with_capacity(entries.len());
    for (e, to_b) in entries.into_iter().zip(in_b) {
        if to_b {
            b.push(e);
        } else {
            a.push(e);
        }
    }
    (a, b)
}

/// Enumerate every bit assignment, entry `i` going to group B when bit `i` is set.
///
/// The last entry is pinned to group A so each partition is visited once rather
/// than twice with the groups swapped; mask zero (everything in A) is skipped.
fn exhaustive<T: Scalar>(entries: &[Entry<T>], min_children: usize) -> Vec<bool> {
    let k = entries.len();
    debug_assert!(k <= 64, "exhaustive split is bounded by the policy");
    let last_mask = (1_u64 << (k - 1)) - 1;
    let mut best: Option<(ScalarAcc<T>, u64)> = None;
    for mask in 1..=last_mask {
        let in_b = mask.count_ones() as usize;
        if in_b < min_children || k - in_b < min_children {
            continue;
        }
        let mut a: Option<BoundingBox<T>> = None;
        let mut b: Option<BoundingBox<T>> = None;
        for (i, e) in entries.iter().enumerate() {
            let group = if mask & (1 << i) == 0 { &mut a } else { &mut b };
            *group = Some(match *group {
                Some(acc) => acc.union(&e.bbox),
                None => e.bbox,
            });
        }
        let (Some(a), Some(b)) = (a, b) else {
            continue;
        };
        let cost = a.area() + b.area();
        if best.is_none_or(|(c, _)| cost < c) {
            best = Some((cost, mask));
        }
    }
    let (_, mask) = best.expect("a validated policy always admits a partition");
    (0..k).map(|i| mask & (1 << i) != 0).collect()
}

/// Sort by centre along each axis and evaluate every admissible cut using
/// prefix/suffix unions, so each axis costs one sort plus a linear scan.
fn sweep<T: Scalar>(entries: &[Entry<T>], min_children: usize) -> Vec<bool> {
    let n = entries.len();
    let lo = min_children.max(1);
    debug_assert!(n >= 2 * lo, "split requires room for both groups");
    let mut best: Option<(ScalarAcc<T>, Vec<usize>, usize)> = None;
    for axis in 0..2 {
        let mut order: Vec<usize> = (0..n).collect();
        if axis == 0 {
            order.sort_by(|&a, &b| {
                cmp_t(&entries[a].bbox.center_key_x(), &entries[b].bbox.center_key_x())
            });
        } else {
            order.sort_by(|&a, &b| {
                cmp_t(&entries[a].bbox.center_key_y(), &entries[b].bbox.center_key_y())
            });
        }

        let mut prefix: Vec<BoundingBox<T>> = Vec::with_capacity(n);
        for &i in &order {
            let bb = entries[i].bbox;
            let acc = prefix.last().map_or(bb, |prev| prev.union(&bb));
            prefix.push(acc);
        }
        let mut suffix: Vec<BoundingBox<T>> = Vec::with_capacity(n);
        for &i in order.iter().rev() {
            let bb = entries[i].bbox;
            let acc = suffix.last().map_or(bb, |prev| bb.union(prev));
            suffix.push(acc);
        }
        suffix.reverse();

        for cut in lo..=(n - lo) {
            let cost = prefix[cut - 1].area() + suffix[cut].area();
            if best.as_ref().is_none_or(|(c, _, _)| cost < *c) {
                best = Some((cost, order.clone(), cut));
            }
        }
    }
    let (_, order, cut) = best.expect("a validated policy always admits a cut");
    let mut in_b = vec![false; n];
    for &i in &order[cut..] {
        in_b[i] = true;
    }
    in_b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(min_x: f64, min_y: f64, max_x: f64, max_y: f64, index: usize) -> Entry<f64> {
        Entry::new(BoundingBox::new(min_x, min_y, max_x, max_y), index)
    }

    fn indices(group: &[Entry<f64>]) -> Vec<usize> {
        group.iter().map(|e| e.index).collect()
    }

    fn two_clusters() -> Vec<Entry<f64>> {
        vec![
            entry(0.0, 0.0, 1.0, 1.0, 0),
            entry(10.0, 10.0, 11.0, 11.0, 1),
            entry(0.5, 0.5, 1.5, 1.5, 2),
            entry(10.5, 10.5, 11.5, 11.5, 3),
            entry(1.0, 0.0, 2.0, 1.0, 4),
        ]
    }

    #[test]
    fn exhaustive_separates_clusters() {
        let (a, b) = partition(two_clusters(), 2, SplitStrategy::Exhaustive);
        // The last entry is pinned to group A.
        assert_eq!(indices(&a), vec![0, 2, 4]);
        assert_eq!(indices(&b), vec![1, 3]);
    }

    #[test]
    fn sweep_separates_clusters() {
        let (a, b) = partition(two_clusters(), 2, SplitStrategy::Sweep);
        let (mut a, mut b) = (indices(&a), indices(&b));
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, vec![0, 2, 4]);
        assert_eq!(b, vec![1, 3]);
    }

    #[test]
    fn exhaustive_respects_min_children() {
        // Four entries clustered together and one outlier: the cheapest split
        // isolates the outlier, but min_children forces at least two per group.
        let entries = vec![
            entry(0.0, 0.0, 1.0, 1.0, 0),
            entry(0.0, 0.0, 1.0, 1.0, 1),
            entry(0.0, 0.0, 1.0, 1.0, 2),
            entry(0.0, 0.0, 1.0, 1.0, 3),
            entry(100.0, 100.0, 101.0, 101.0, 4),
        ];
        let (a, b) = partition(entries.clone(), 1, SplitStrategy::Exhaustive);
        assert_eq!(indices(&a), vec![4]);
        assert_eq!(b.len(), 4);

        let (a, b) = partition(entries, 2, SplitStrategy::Exhaustive);
        assert!(a.len() >= 2 && b.len() >= 2);
        assert_eq!(a.len() + b.len(), 5);
    }

    #[test]
    fn ties_keep_first_partition_found() {
        // All boxes identical: every partition has the same cost, so the first
        // admissible mask (entries 0 and 1 in group B) wins.
        let entries: Vec<_> = (0..5).map(|i| entry(0.0, 0.0, 1.0, 1.0, i)).collect();
        let (a, b) = partition(entries, 2, SplitStrategy::Exhaustive);
        assert_eq!(indices(&b), vec![0, 1]);
        assert_eq!(indices(&a), vec![2, 3, 4]);
    }

    #[test]
    fn zero_min_children_still_yields_two_groups() {
        let entries = vec![entry(0.0, 0.0, 1.0, 1.0, 0), entry(5.0, 5.0, 6.0, 6.0, 1)];
        for strategy in [SplitStrategy::Exhaustive, SplitStrategy::Sweep] {
            let (a, b) = partition(entries.clone(), 0, strategy);
            assert_eq!(a.len(), 1);
            assert_eq!(b.len(), 1);
        }
    }

    #[test]
    fn degenerate_points_split() {
        let entries: Vec<_> = (0..9)
            .map(|i| {
                let x = f64::from(i);
                entry(x, 0.0, x, 0.0, i as usize)
            })
            .collect();
        let (a, b) = partition(entries.clone(), 4, SplitStrategy::Exhaustive);
        assert!(a.len() >= 4 && b.len() >= 4);
        let (a, b) = partition(entries, 4, SplitStrategy::Sweep);
        assert!(a.len() >= 4 && b.len() >= 4);
    }
}
