// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition-pruning filter and join operators, two-pass k-NN, skyline, and
//! the `Collaborator` trait contract the core is embedded behind
//! (`spec.md` §4.5–§4.8, §6).
//!
//! This crate defines the operator algorithms and the interface they expect
//! from a bulk-parallel runtime; it ships no such runtime itself. The
//! [`local`] module's [`local::LocalRuntime`] is a single-threaded reference
//! implementation used only by this workspace's own tests.

mod cancellation;
mod collaborator;
mod filter;
mod geom;
mod join;
mod knn;
mod skyline;

pub mod local;

pub use cancellation::CancellationToken;
pub use collaborator::{Broadcast, Collaborator, CollaboratorRuntime};
pub use filter::filter;
pub use join::{join, join_predicate, one_to_many_right_partitions};
pub use knn::{knn, Knn};
pub use skyline::{skyline_agg, skyline_angular, skyline_bbs, Skyline};
