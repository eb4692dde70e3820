// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! STARK: a spatio-temporal partitioning, indexing, and operator core.
//!
//! This crate is a thin facade over the workspace's individual crates, for
//! callers that want the whole core behind one dependency:
//!
//! - [`stark_types`] — geometry/cell/predicate value types and [`StarkError`].
//! - [`stark_geometry`] — the `GeoType` façade over point/rect/polygon geometry.
//! - [`stark_histogram`] — the uniform cell histogram and its summed-area cost table.
//! - [`stark_partition`] — [`GridPartitioner`], [`BspPartitioner`], and the partition manifest.
//! - [`stark_rtree`] — the STR-bulk-loaded [`RTree`].
//! - [`stark_ops`] — filter, join, k-NN, skyline, and the `Collaborator` contract.
//!
//! None of the crates above initialize logging on your behalf; call
//! [`telemetry::init_default_subscriber`] explicitly if you want one.

pub mod telemetry;

pub use stark_geometry::GeoType;
pub use stark_histogram::{CellHistogram, CostTable, HistogramConfig, Universe};
pub use stark_ops::{
    filter, join, join_predicate, knn, local, one_to_many_right_partitions, skyline_agg, skyline_angular,
    skyline_bbs, Broadcast, CancellationToken, Collaborator, CollaboratorRuntime, Knn, Skyline,
};
pub use stark_partition::{manifest, BspConfig, BspPartitioner, GridConfig, GridPartitioner, GridSizing, Partitioner};
pub use stark_rtree::{Built, Mutable, RTree, RTreeConfig, RTreeHandle, State, WithinDistanceCandidate, DEFAULT_ORDER};
pub use stark_types::{Cell, NPoint, NRectRange, Predicate, STObject, StarkError, StarkResult, TemporalExpr, EPS};
