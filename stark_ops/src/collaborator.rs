// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `Collaborator` contract (`spec.md` §6): the bulk-parallel runtime the
//! core is embedded in. STARK itself ships no production implementation —
//! every operator in this crate is generic over `C: Collaborator<T>` and a
//! caller supplies the scheduling (Spark-like, thread-pool, whatever fits
//! the host). [`crate::local`] provides a single-threaded reference
//! implementation used only by this workspace's own tests.

use std::borrow::Borrow;

use stark_partition::Partitioner;
use stark_types::STObject;

use crate::cancellation::CancellationToken;

/// A partitioned collection of `T`, scheduled in bulk across partitions by
/// an external runtime.
///
/// Index arguments are stable partition ids matching the dataset's
/// [`Partitioner`], per `spec.md` §6's `mapPartitionsWithIndex` clause.
pub trait Collaborator<T> {
    /// The partitioner governing this collection's layout.
    type Partitioner: Partitioner;

    /// The collection's partitioner.
    fn partitioner(&self) -> &Self::Partitioner;

    /// The number of partitions.
    fn num_partitions(&self) -> u32 {
        self.partitioner().num_partitions()
    }

    /// A cancellable element stream over one partition.
    fn iterator(&self, partition: u32, token: &CancellationToken) -> impl Iterator<Item = T> + '_;

    /// Apply `f` to each partition's full element stream, tagging the
    /// result with the partition id it came from.
    fn map_partitions_with_index<U>(
        &self,
        token: &CancellationToken,
        f: impl Fn(u32, &mut dyn Iterator<Item = T>) -> Vec<U>,
    ) -> Vec<(u32, Vec<U>)> {
        (0..self.num_partitions())
            .map(|p| (p, f(p, &mut self.iterator(p, token))))
            .collect()
    }

    /// [`Collaborator::map_partitions_with_index`] without the partition
    /// index threaded through.
    fn map_partitions<U>(&self, token: &CancellationToken, f: impl Fn(&mut dyn Iterator<Item = T>) -> Vec<U>) -> Vec<U> {
        self.map_partitions_with_index(token, |_, it| f(it))
            .into_iter()
            .flat_map(|(_, v)| v)
            .collect()
    }

    /// Fold every partition's elements into `zero` via `seq`, then combine
    /// the per-partition accumulators via the associative, commutative
    /// `comb`.
    fn aggregate<U: Clone>(&self, token: &CancellationToken, zero: U, seq: impl Fn(U, T) -> U, comb: impl Fn(U, U) -> U) -> U {
        (0..self.num_partitions())
            .map(|p| self.iterator(p, token).fold(zero.clone(), &seq))
            .fold(zero, comb)
    }

    /// Pull every element into a single `Vec` (a synchronization barrier).
    fn collect(&self) -> Vec<T> {
        let token = CancellationToken::new();
        (0..self.num_partitions())
            .flat_map(|p| self.iterator(p, &token).collect::<Vec<_>>())
            .collect()
    }

    /// The first `k` elements across all partitions, in unspecified order
    /// unless the producing operator declares otherwise.
    fn take(&self, k: usize) -> Vec<T> {
        self.collect().into_iter().take(k).collect()
    }

    /// Sort the whole collection by a derived key (a synchronization
    /// barrier; the core never relies on partition-local order surviving
    /// this call).
    fn sort_by_key<K: Ord>(&self, key: impl Fn(&T) -> K) -> Vec<T> {
        let mut all = self.collect();
        all.sort_by_key(key);
        all
    }
}

/// A read-only value sent by reference to every task rather than shipped
/// once per partition (`spec.md` §5: "shared read-only state ... is sent by
/// value").
pub trait Broadcast<T> {
    /// The broadcast value.
    fn value(&self) -> &T;
}

/// `partitionBy` and `parallelize` live on the runtime itself rather than on
/// a specific collection, since they are how a collection comes into being
/// or changes layout in the first place.
pub trait CollaboratorRuntime {
    /// The collaborator type this runtime produces, generic over element
    /// type and partitioner.
    type Collection<T, P: Partitioner>: Collaborator<T, Partitioner = P>;

    /// A partitioned collaborator over `items`, laid out by `partitioner`.
    fn parallelize<T, P: Partitioner>(&self, items: Vec<T>, partitioner: P) -> Self::Collection<T, P>;

    /// Rehash an existing collaborator's elements via `partitioner` and
    /// return a collaborator laid out under the new partitioner.
    fn partition_by<T, P: Partitioner>(&self, source: &impl Collaborator<T>, partitioner: P) -> Self::Collection<T, P>
    where
        T: Clone + Borrow<STObject>;

    /// Broadcast `value` to every task without re-shipping it per partition.
    fn broadcast<T>(&self, value: T) -> impl Broadcast<T>;
}
