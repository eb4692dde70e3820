// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-pass k-NN (`spec.md` §4.7): a bounded [`Knn`] accumulator per
//! partition, merged into a global top-`k`.

use stark_partition::Partitioner;
use stark_types::{GeoType, NPoint, STObject, StarkResult};

use crate::cancellation::CancellationToken;
use crate::collaborator::Collaborator;

/// A bounded max-`k` accumulator of `(distance, value)` pairs, closest
/// first. `insert` is O(k) worst case (a full replacement re-scans for the
/// new extremes); `merge` is a cheap min/max bound check followed by at
/// most `k` more inserts.
#[derive(Clone, Debug)]
pub struct Knn<T> {
    k: usize,
    items: Vec<(f64, T)>,
    min_idx: Option<usize>,
    max_idx: Option<usize>,
}

impl<T> Knn<T> {
    /// A bounded accumulator that keeps at most `k` candidates.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
            min_idx: None,
            max_idx: None,
        }
    }

    /// How many candidates are currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no candidates have been inserted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether this accumulator holds `k` candidates already.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.k
    }

    /// The largest distance currently held.
    pub fn max_dist(&self) -> Option<f64> {
        self.max_idx.map(|i| self.items[i].0)
    }

    /// The smallest distance currently held.
    pub fn min_dist(&self) -> Option<f64> {
        self.min_idx.map(|i| self.items[i].0)
    }

    fn recompute_extremes(&mut self) {
        self.min_idx = None;
        self.max_idx = None;
        for (i, (d, _)) in self.items.iter().enumerate() {
            if self.min_idx.is_none_or(|m| *d < self.items[m].0) {
                self.min_idx = Some(i);
            }
            if self.max_idx.is_none_or(|m| *d > self.items[m].0) {
                self.max_idx = Some(i);
            }
        }
    }

    /// Insert a candidate. If not yet full, it is appended; otherwise it
    /// replaces the current max iff strictly closer.
    pub fn insert(&mut self, d: f64, v: T) {
        if self.k == 0 {
            return;
        }
        if !self.is_full() {
            self.items.push((d, v));
            self.recompute_extremes();
            return;
        }
        if let Some(max_i) = self.max_idx {
            if d < self.items[max_i].0 {
                self.items[max_i] = (d, v);
                self.recompute_extremes();
            }
        }
    }

    /// Combine `other` into `self`, consuming both. Short-circuits without
    /// inspecting `other`'s items when `self` is already full and every
    /// candidate in `other` is provably farther than `self`'s current max.
    pub fn merge(mut self, other: Self) -> Self {
        if self.is_full() {
            if let (Some(self_max), Some(other_min)) = (self.max_dist(), other.min_dist()) {
                if other_min > self_max {
                    return self;
                }
            }
        }
        for (d, v) in other.items {
            self.insert(d, v);
        }
        self
    }

    /// The held candidates sorted ascending by distance; ties keep their
    /// relative insertion order (a stable sort).
    pub fn into_sorted_vec(self) -> Vec<(f64, T)> {
        let mut items = self.items;
        items.sort_by(|a, b| a.0.total_cmp(&b.0));
        items
    }
}

/// Local top-`k` per partition by distance to `query`, merged into the
/// global `k` nearest (`spec.md` §4.7's two-pass design).
pub fn knn<C: Collaborator<STObject>>(
    data: &C,
    query: &NPoint,
    k: usize,
    token: &CancellationToken,
) -> StarkResult<Vec<STObject>> {
    if k == 0 {
        return Ok(Vec::new());
    }
    let query_geom = GeoType::point(query.x(), query.y());
    let partitioner = data.partitioner();
    let mut global = Knn::new(k);

    for id in 0..partitioner.num_partitions() {
        if partitioner.is_empty(id) {
            continue;
        }
        let mut local = Knn::new(k);
        for obj in data.iterator(id, token) {
            token.check(Some(id))?;
            let d = obj.geom().distance(&query_geom);
            local.insert(d, obj);
        }
        tracing::trace!(partition = id, local_candidates = local.len(), "knn local pass done");
        global = global.merge(local);
    }

    Ok(global.into_sorted_vec().into_iter().map(|(_, v)| v).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::CollaboratorRuntime;
    use crate::local::LocalRuntime;
    use stark_partition::{GridConfig, GridPartitioner, GridSizing, Universe};

    #[test]
    fn insert_replaces_max_when_strictly_closer() {
        let mut knn = Knn::new(2);
        knn.insert(5.0, "far");
        knn.insert(3.0, "mid");
        assert_eq!(knn.max_dist(), Some(5.0));
        knn.insert(1.0, "near");
        let sorted = knn.into_sorted_vec();
        assert_eq!(sorted, vec![(1.0, "near"), (3.0, "mid")]);
    }

    #[test]
    fn merge_short_circuits_on_provably_farther_other() {
        let mut a = Knn::new(1);
        a.insert(1.0, "a");
        let mut b = Knn::new(1);
        b.insert(100.0, "b");
        let merged = a.merge(b);
        assert_eq!(merged.into_sorted_vec(), vec![(1.0, "a")]);
    }

    fn partitioner() -> GridPartitioner {
        let config = GridConfig {
            universe: Universe::new(0.0, 10.0, 0.0, 10.0),
            sizing: GridSizing::FixedSide { x_len: 10.0, y_len: 10.0 },
            points_only: true,
        };
        GridPartitioner::build(config, std::iter::empty::<&STObject>()).unwrap()
    }

    #[test]
    fn two_pass_merge_finds_global_k_nearest() {
        let runtime = LocalRuntime;
        let objs: Vec<STObject> = (0..10)
            .map(|i| STObject::spatial(GeoType::point(i as f64, 0.0)))
            .collect();
        let collab = runtime.parallelize(objs, partitioner());
        let token = CancellationToken::new();
        let result = knn(&collab, &NPoint::xy(0.0, 0.0), 3, &token).unwrap();
        assert_eq!(result.len(), 3);
        let xs: Vec<f64> = result.iter().map(|o| o.geom().centroid().x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }
}
