// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial partitioners over a bounded universe (`spec.md` §4.2–§4.3).
//!
//! [`GridPartitioner`] and [`BspPartitioner`] both implement the shared
//! [`Partitioner`] trait so operators (`stark_ops`) and the collaborator
//! runtime can depend on a single interface regardless of which partitioning
//! strategy produced a dataset's layout.

mod bsp;
mod grid;
pub mod manifest;
mod partitioner;

pub use bsp::{BspConfig, BspPartitioner};
pub use grid::{GridConfig, GridPartitioner, GridSizing};
pub use manifest::ManifestEntry;
pub use partitioner::Partitioner;

pub use stark_histogram::Universe;
