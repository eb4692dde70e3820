// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-threaded, `Vec`-backed [`Collaborator`] used only by this
//! workspace's own test suite. It is deliberately not exported as a
//! production runtime (`spec.md` §6 treats the collaborator as an external
//! concern); it exists so `stark_ops`'s operators can be exercised without a
//! real bulk-parallel engine.

use std::borrow::Borrow;

use stark_partition::Partitioner;
use stark_types::STObject;

use crate::cancellation::CancellationToken;
use crate::collaborator::{Broadcast, Collaborator, CollaboratorRuntime};

/// An in-memory collaborator: one `Vec<T>` per partition, walked serially.
#[derive(Clone, Debug)]
pub struct LocalCollaborator<T, P> {
    partitioner: P,
    partitions: Vec<Vec<T>>,
}

impl<T, P: Partitioner> LocalCollaborator<T, P> {
    /// Build a collaborator from already-partitioned data. `partitions.len()`
    /// must equal `partitioner.num_partitions()`.
    pub fn new(partitioner: P, partitions: Vec<Vec<T>>) -> Self {
        debug_assert_eq!(partitions.len(), partitioner.num_partitions() as usize);
        Self { partitioner, partitions }
    }
}

impl<T, P: Partitioner> Collaborator<T> for LocalCollaborator<T, P> {
    type Partitioner = P;

    fn partitioner(&self) -> &Self::Partitioner {
        &self.partitioner
    }

    fn iterator(&self, partition: u32, token: &CancellationToken) -> impl Iterator<Item = T> + '_ {
        LocalPartitionIter {
            inner: self.partitions[partition as usize].iter(),
            token: token.clone(),
            partition,
        }
    }
}

struct LocalPartitionIter<'a, T> {
    inner: std::slice::Iter<'a, T>,
    token: CancellationToken,
    partition: u32,
}

impl<'a, T: Clone> Iterator for LocalPartitionIter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.token.is_cancelled() {
            tracing::trace!(partition = self.partition, "local iterator observed cancellation");
            return None;
        }
        self.inner.next().cloned()
    }
}

/// Builds [`LocalCollaborator`]s. The only `CollaboratorRuntime` implementor
/// in this workspace; intended for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalRuntime;

impl CollaboratorRuntime for LocalRuntime {
    type Collection<T, P: Partitioner> = LocalCollaborator<T, P>;

    fn parallelize<T, P: Partitioner>(&self, items: Vec<T>, partitioner: P) -> LocalCollaborator<T, P> {
        let n = partitioner.num_partitions().max(1) as usize;
        let mut partitions: Vec<Vec<T>> = (0..n).map(|_| Vec::new()).collect();
        for (i, item) in items.into_iter().enumerate() {
            partitions[i % n].push(item);
        }
        LocalCollaborator::new(partitioner, partitions)
    }

    fn partition_by<T, P: Partitioner>(&self, source: &impl Collaborator<T>, partitioner: P) -> LocalCollaborator<T, P>
    where
        T: Clone + Borrow<STObject>,
    {
        let n = partitioner.num_partitions() as usize;
        let mut partitions: Vec<Vec<T>> = (0..n).map(|_| Vec::new()).collect();
        for item in source.collect() {
            let id = partitioner
                .get_partition_id(item.borrow())
                .expect("partition_by routes keys already validated against the target universe");
            partitions[id as usize].push(item);
        }
        LocalCollaborator::new(partitioner, partitions)
    }

    fn broadcast<T>(&self, value: T) -> impl Broadcast<T> {
        LocalBroadcast(value)
    }
}

struct LocalBroadcast<T>(T);

impl<T> Broadcast<T> for LocalBroadcast<T> {
    fn value(&self) -> &T {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stark_partition::{GridConfig, GridPartitioner, GridSizing, Universe};
    use stark_types::GeoType;

    fn partitioner() -> GridPartitioner {
        let config = GridConfig {
            universe: Universe::new(0.0, 10.0, 0.0, 10.0),
            sizing: GridSizing::FixedSide { x_len: 5.0, y_len: 5.0 },
            points_only: true,
        };
        GridPartitioner::build(config, std::iter::empty::<&STObject>()).unwrap()
    }

    #[test]
    fn parallelize_round_robins_across_partitions() {
        let runtime = LocalRuntime;
        let collab = runtime.parallelize(vec![1, 2, 3, 4, 5], partitioner());
        assert_eq!(collab.collect().into_iter().sum::<i32>(), 15);
    }

    #[test]
    fn partition_by_routes_via_get_partition_id() {
        let runtime = LocalRuntime;
        let items = vec![
            STObject::spatial(GeoType::point(1.0, 1.0)),
            STObject::spatial(GeoType::point(8.0, 8.0)),
        ];
        let source = runtime.parallelize(items, partitioner());
        let rehashed = runtime.partition_by(&source, partitioner());
        assert_eq!(rehashed.collect().len(), 2);
    }

    #[test]
    fn cancellation_stops_iteration_between_elements() {
        let runtime = LocalRuntime;
        let collab = runtime.parallelize(vec![1, 2, 3], partitioner());
        let token = CancellationToken::new();
        token.cancel();
        let drained: Vec<_> = collab.iterator(0, &token).collect();
        assert!(drained.is_empty());
    }
}
