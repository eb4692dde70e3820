// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `Partitioner` trait shared by [`crate::GridPartitioner`] and
//! [`crate::BspPartitioner`] (`spec.md` §9: "collapse the `SpatialPartitioner /
//! GridPartitioner / BSPPartitioner` hierarchy to a single trait").

use std::io;
use std::path::Path;

use stark_types::{Cell, NRectRange, STObject, StarkResult};

use crate::manifest::{self, ManifestEntry};

/// Common interface every STARK partitioner implements, matching the
/// collaborator contract in `spec.md` §6.
pub trait Partitioner {
    /// The number of partitions this partitioner produces.
    fn num_partitions(&self) -> u32;

    /// The partition id `key` is routed to.
    fn get_partition_id(&self, key: &STObject) -> StarkResult<u32>;

    /// The spatial (and, for grid/BSP cells, count-bearing) bounds of
    /// partition `id`.
    fn partition_bounds(&self, id: u32) -> &Cell;

    /// The accumulated extent of partition `id` (shorthand for
    /// `partition_bounds(id).extent()`).
    fn partition_extent(&self, id: u32) -> &NRectRange {
        self.partition_bounds(id).extent()
    }

    /// Whether partition `id` has ever had a record routed to it.
    fn is_empty(&self, id: u32) -> bool;

    /// Write the partition manifest sidecar for every partition, pairing
    /// partition `id` with `part_file_names[id]`. The partitioner has no
    /// notion of a per-partition temporal range, so both temporal fields are
    /// left unbounded; a caller tracking temporal extents writes its own
    /// manifest via [`manifest::write_manifest_file`] directly.
    fn write_partition_manifest(&self, path: &Path, part_file_names: &[String]) -> io::Result<()> {
        let entries: Vec<ManifestEntry> = (0..self.num_partitions())
            .map(|id| ManifestEntry {
                envelope: self.partition_extent(id).clone(),
                start_millis: None,
                end_millis: None,
                part_file_name: part_file_names[id as usize].clone(),
            })
            .collect();
        manifest::write_manifest_file(path, &entries)
    }
}
