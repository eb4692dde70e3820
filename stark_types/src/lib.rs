// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core spatio-temporal value types shared by every STARK crate.
//!
//! This crate has no notion of partitioning, indexing, or operators — it
//! only defines the values those layers move around: [`NPoint`] and
//! [`NRectRange`] (`n`-dimensional geometry primitives), [`Cell`] (a
//! histogram/partition bucket), [`TemporalExpr`] and [`STObject`] (the
//! spatio-temporal predicate algebra), and the shared [`StarkError`] enum.

mod cell;
mod error;
mod npoint;
mod nrectrange;
mod stobject;
mod temporal;

pub use cell::Cell;
pub use error::{StarkError, StarkResult};
pub use npoint::NPoint;
pub use nrectrange::{NRectRange, EPS};
pub use stobject::{Predicate, STObject};
pub use temporal::TemporalExpr;

pub use stark_geometry::GeoType;
