// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `query`, `knn`, and `within_distance` over a built R-tree (`spec.md` §4.4).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use stark_types::{NPoint, NRectRange};

use crate::{Built, Node, RTree};

impl<T> RTree<T, Built> {
    /// Every payload whose MBR intersects `envelope` (a candidate set; the
    /// caller applies the exact predicate).
    pub fn query(&self, envelope: &NRectRange) -> impl Iterator<Item = &T> {
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push(root);
        }
        let mut out = Vec::new();
        while let Some(idx) = stack.pop() {
            match &self.nodes[idx] {
                Node::Internal { mbr, children } => {
                    if mbr.intersects(envelope) {
                        stack.extend(children.iter().copied());
                    }
                }
                Node::Leaf { mbr, entries } => {
                    if mbr.intersects(envelope) {
                        for e in &self.entries[entries.clone()] {
                            if e.mbr.intersects(envelope) {
                                out.push(&e.payload);
                            }
                        }
                    }
                }
            }
        }
        out.into_iter()
    }

    /// Best-first `k` nearest neighbors to `point` by MBR `MINDIST`, yielded
    /// in non-decreasing distance order.
    pub fn knn(&self, point: &NPoint, k: usize) -> Vec<(&NRectRange, &T)> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
        heap.push(HeapEntry { dist: 0.0, item: Candidate::Node(root) });

        let mut results = Vec::with_capacity(k);
        while let Some(HeapEntry { item, .. }) = heap.pop() {
            if results.len() >= k {
                break;
            }
            match item {
                Candidate::Node(idx) => match &self.nodes[idx] {
                    Node::Internal { children, .. } => {
                        for &child in children {
                            let dist = mindist_point_rect(point, self.nodes[child].mbr());
                            heap.push(HeapEntry { dist, item: Candidate::Node(child) });
                        }
                    }
                    Node::Leaf { entries, .. } => {
                        for entry_idx in entries.clone() {
                            let entry = &self.entries[entry_idx];
                            let dist = mindist_point_rect(point, &entry.mbr);
                            heap.push(HeapEntry { dist, item: Candidate::Entry(entry_idx) });
                        }
                    }
                },
                Candidate::Entry(entry_idx) => {
                    let entry = &self.entries[entry_idx];
                    results.push((&entry.mbr, &entry.payload));
                }
            }
        }
        results
    }

    /// Every payload within `max_dist` of `envelope` under `dist_fn`, pruning
    /// nodes whose MBR `MINDIST` to `envelope` already exceeds `max_dist`.
    pub fn within_distance<'a>(
        &'a self,
        envelope: &'a NRectRange,
        dist_fn: impl Fn(&NRectRange) -> f64 + 'a,
        max_dist: f64,
    ) -> impl Iterator<Item = WithinDistanceCandidate<'a, T>> {
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push(root);
        }
        let mut out = Vec::new();
        while let Some(idx) = stack.pop() {
            match &self.nodes[idx] {
                Node::Internal { mbr, children } => {
                    if mindist_rect_rect(mbr, envelope) <= max_dist {
                        stack.extend(children.iter().copied());
                    }
                }
                Node::Leaf { mbr, entries } => {
                    if mindist_rect_rect(mbr, envelope) <= max_dist {
                        for e in &self.entries[entries.clone()] {
                            let dist = dist_fn(&e.mbr);
                            if dist <= max_dist {
                                out.push(WithinDistanceCandidate { payload: &e.payload, distance: dist });
                            }
                        }
                    }
                }
            }
        }
        out.into_iter()
    }
}

/// A payload returned by [`RTree::within_distance`] paired with the distance
/// `dist_fn` reported for it.
#[derive(Debug)]
pub struct WithinDistanceCandidate<'a, T> {
    /// The matching payload.
    pub payload: &'a T,
    /// The distance `dist_fn` computed for it.
    pub distance: f64,
}

enum Candidate {
    Node(usize),
    Entry(usize),
}

struct HeapEntry {
    dist: f64,
    item: Candidate,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest distance pops first.
        other.dist.total_cmp(&self.dist)
    }
}

fn mindist_point_rect(p: &NPoint, r: &NRectRange) -> f64 {
    let dx = (r.ll().x() - p.x()).max(0.0).max(p.x() - r.ur().x());
    let dy = (r.ll().y() - p.y()).max(0.0).max(p.y() - r.ur().y());
    dx.hypot(dy)
}

fn mindist_rect_rect(a: &NRectRange, b: &NRectRange) -> f64 {
    let dx = (b.ll().x() - a.ur().x()).max(0.0).max(a.ll().x() - b.ur().x());
    let dy = (b.ll().y() - a.ur().y()).max(0.0).max(a.ll().y() - b.ur().y());
    dx.hypot(dy)
}

/// A small seeded xorshift64* generator for randomized tests. Not a
/// dependency on any `rand` crate: just enough to get reproducible
/// pseudo-random coordinates without pulling in a dev-dependency.
#[cfg(test)]
struct XorShift64(u64);

#[cfg(test)]
impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self(seed | 1)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn next_f64(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RTree;
    use std::num::NonZeroUsize;

    fn grid_tree() -> RTree<(f64, f64), Built> {
        let mut tree = RTree::new(NonZeroUsize::new(8).unwrap());
        for x in 0..10 {
            for y in 0..10 {
                let (x, y) = (x as f64, y as f64);
                tree.insert(NRectRange::xyxy(x, y, x + 1.0, y + 1.0), (x, y));
            }
        }
        tree.build()
    }

    #[test]
    fn query_outside_all_data_is_empty() {
        let tree = grid_tree();
        let hits: Vec<_> = tree.query(&NRectRange::xyxy(200.0, 200.0, 300.0, 300.0)).collect();
        assert!(hits.is_empty());
    }

    #[test]
    fn query_returns_superset_of_exact_intersection() {
        let tree = grid_tree();
        let envelope = NRectRange::xyxy(2.0, 2.0, 5.0, 5.0);
        let hits: Vec<_> = tree.query(&envelope).collect();
        for (x, y) in [(2.0, 2.0), (4.0, 4.0)] {
            assert!(hits.contains(&&(x, y)), "missing ({x}, {y})");
        }
        for &(x, y) in hits.iter() {
            assert!(NRectRange::xyxy(*x, *y, x + 1.0, y + 1.0).intersects(&envelope));
        }
    }

    #[test]
    fn knn_orders_by_ascending_distance() {
        let tree = grid_tree();
        let results = tree.knn(&NPoint::xy(-5.0, -5.0), 3);
        assert_eq!(results.len(), 3);
        let mut prev = 0.0;
        for (mbr, _) in &results {
            let d = mindist_point_rect(&NPoint::xy(-5.0, -5.0), mbr);
            assert!(d >= prev);
            prev = d;
        }
    }

    #[test]
    fn knn_k_greater_than_len_returns_everything() {
        let mut tree = RTree::new(NonZeroUsize::new(4).unwrap());
        tree.insert(NRectRange::xyxy(0.0, 0.0, 1.0, 1.0), "a");
        let built = tree.build();
        assert_eq!(built.knn(&NPoint::xy(0.0, 0.0), 10).len(), 1);
    }

    #[test]
    fn within_distance_prunes_far_nodes() {
        let tree = grid_tree();
        let origin = NRectRange::xyxy(0.0, 0.0, 0.0, 0.0);
        let hits: Vec<_> = tree
            .within_distance(&origin, |mbr| mindist_rect_rect(mbr, &origin), 1.5)
            .collect();
        assert!(hits.iter().all(|c| c.distance <= 1.5));
        assert!(!hits.is_empty());
    }

    #[test]
    fn query_matches_brute_force_over_random_rectangles() {
        let mut rng = XorShift64::new(0xC0FF_EE);
        let mbrs: Vec<NRectRange> = (0..200)
            .map(|_| {
                let x0 = rng.next_f64(0.0, 100.0);
                let y0 = rng.next_f64(0.0, 100.0);
                NRectRange::xyxy(x0, y0, x0 + rng.next_f64(0.1, 5.0), y0 + rng.next_f64(0.1, 5.0))
            })
            .collect();

        let mut tree = RTree::new(NonZeroUsize::new(6).unwrap());
        for (i, mbr) in mbrs.iter().enumerate() {
            tree.insert(*mbr, i);
        }
        let built = tree.build();

        for _ in 0..30 {
            let x0 = rng.next_f64(-10.0, 110.0);
            let y0 = rng.next_f64(-10.0, 110.0);
            let query_env = NRectRange::xyxy(x0, y0, x0 + rng.next_f64(1.0, 20.0), y0 + rng.next_f64(1.0, 20.0));

            let mut got: Vec<usize> = built.query(&query_env).copied().collect();
            got.sort_unstable();

            let mut expected: Vec<usize> = mbrs
                .iter()
                .enumerate()
                .filter(|(_, mbr)| mbr.intersects(&query_env))
                .map(|(i, _)| i)
                .collect();
            expected.sort_unstable();

            assert_eq!(got, expected);
        }
    }
}
