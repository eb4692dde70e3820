// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! STR (sort-tile-recursive) bulk loading.
//!
//! Grounded on the bulk-build note the pack's R-tree/BVH backends document:
//! sort by one axis, tile into vertical slices of `sqrt(numLeaves)` groups,
//! sort each slice by the other axis, and cut into fanout-sized leaves; the
//! same packing is then applied one level up at a time until a single root
//! remains.

use std::marker::PhantomData;
use std::num::NonZeroUsize;

use stark_types::NRectRange;

use crate::{Built, Entry, Node, RTree};

pub(crate) fn bulk_load<T>(order: NonZeroUsize, entries: Vec<Entry<T>>) -> RTree<T, Built> {
    let m = order.get();

    if entries.is_empty() {
        return RTree {
            order,
            entries,
            nodes: Vec::new(),
            root: None,
            _state: PhantomData,
        };
    }

    let leaf_groups = str_pack(
        entries.iter().enumerate().map(|(i, e)| (e.mbr.clone(), i)).collect(),
        m,
    );

    let mut slots: Vec<Option<Entry<T>>> = entries.into_iter().map(Some).collect();
    let mut packed_entries = Vec::with_capacity(slots.len());
    let mut nodes = Vec::new();
    let mut level: Vec<(NRectRange, usize)> = Vec::with_capacity(leaf_groups.len());

    for group in &leaf_groups {
        let start = packed_entries.len();
        for &id in group {
            packed_entries.push(slots[id].take().expect("STR pack visits each entry exactly once"));
        }
        let range = start..packed_entries.len();
        let mbr = envelope_of(&packed_entries[range.clone()]);
        let node_idx = nodes.len();
        nodes.push(Node::Leaf { mbr: mbr.clone(), entries: range });
        level.push((mbr, node_idx));
    }

    while level.len() > 1 {
        let groups = str_pack(
            level.iter().enumerate().map(|(i, (mbr, _))| (mbr.clone(), i)).collect(),
            m,
        );
        let mut next_level = Vec::with_capacity(groups.len());
        for group in &groups {
            let children: Vec<usize> = group.iter().map(|&i| level[i].1).collect();
            let mbr = children
                .iter()
                .map(|&idx| nodes[idx].mbr().clone())
                .reduce(|acc, m| acc.extend(&m))
                .expect("a group has at least one child");
            let node_idx = nodes.len();
            nodes.push(Node::Internal { mbr: mbr.clone(), children });
            next_level.push((mbr, node_idx));
        }
        level = next_level;
    }

    let root = level.first().map(|(_, idx)| *idx);

    RTree {
        order,
        entries: packed_entries,
        nodes,
        root,
        _state: PhantomData,
    }
}

fn envelope_of<T>(entries: &[Entry<T>]) -> NRectRange {
    entries
        .iter()
        .map(|e| e.mbr.clone())
        .reduce(|acc, m| acc.extend(&m))
        .expect("a leaf group has at least one entry")
}

/// Tile `items` (an MBR paired with an opaque id) into groups of at most `m`
/// ids each, via sort-by-x / slice / sort-by-y / cut-by-`m`.
fn str_pack(mut items: Vec<(NRectRange, usize)>, m: usize) -> Vec<Vec<usize>> {
    let n = items.len();
    if n <= m {
        return vec![items.into_iter().map(|(_, id)| id).collect()];
    }

    let num_leaves = n.div_ceil(m);
    let num_slices = (num_leaves as f64).sqrt().ceil() as usize;
    let slice_size = (num_slices * m).max(1);

    items.sort_by(|a, b| centroid_x(&a.0).total_cmp(&centroid_x(&b.0)));

    let mut groups = Vec::with_capacity(num_leaves);
    for slice in items.chunks(slice_size) {
        let mut slice = slice.to_vec();
        slice.sort_by(|a, b| centroid_y(&a.0).total_cmp(&centroid_y(&b.0)));
        for chunk in slice.chunks(m) {
            groups.push(chunk.iter().map(|(_, id)| id).copied().collect());
        }
    }
    groups
}

fn centroid_x(r: &NRectRange) -> f64 {
    (r.ll().x() + r.ur().x()) / 2.0
}

fn centroid_y(r: &NRectRange) -> f64 {
    (r.ll().y() + r.ur().y()) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RTree;

    #[test]
    fn build_on_empty_tree_has_no_root() {
        let tree: RTree<u32> = RTree::new(NonZeroUsize::new(4).unwrap()).build();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn build_packs_every_entry_exactly_once() {
        let mut tree = RTree::new(NonZeroUsize::new(4).unwrap());
        for i in 0..37 {
            let x = (i % 10) as f64;
            let y = (i / 10) as f64;
            tree.insert(NRectRange::xyxy(x, y, x + 1.0, y + 1.0), i);
        }
        let built = tree.build();
        assert_eq!(built.len(), 37);
        let mut payloads: Vec<u32> = built.entries.iter().map(|e| e.payload).collect();
        payloads.sort_unstable();
        assert_eq!(payloads, (0..37).collect::<Vec<_>>());
    }
}
