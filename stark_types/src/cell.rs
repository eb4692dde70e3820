// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Cell`: a histogram/partition bucket with a range and an accumulated extent.

use crate::NRectRange;

/// A single cell: its id, its fixed `range`, and the `extent` that
/// accumulates the envelopes of objects centered inside `range`.
///
/// Invariant: `extent` always encloses `range`'s contributing objects and
/// therefore `extent ⊇ range` is not required structurally (an empty cell's
/// extent may be smaller than its range) — but once any object has been
/// folded in, `extent` contains every contributing envelope. For
/// point-only datasets `extent == range` is maintained (`spec.md` §3).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    id: u64,
    range: NRectRange,
    extent: NRectRange,
}

impl Cell {
    /// Build a cell whose extent starts out equal to its range (the state
    /// before any object has been folded in).
    pub fn new(id: u64, range: NRectRange) -> Self {
        let extent = range.clone();
        Self { id, range, extent }
    }

    /// The cell id (`cy * numXCells + cx` for a 2-D grid, per `spec.md` §4.1).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The cell's fixed spatial range.
    pub fn range(&self) -> &NRectRange {
        &self.range
    }

    /// The accumulated extent of objects whose centroid falls in `range`.
    pub fn extent(&self) -> &NRectRange {
        &self.extent
    }

    /// Extend this cell's extent with an object's envelope.
    pub fn extend_extent(&mut self, envelope: &NRectRange) {
        self.extent = self.extent.extend(envelope);
    }

    /// Merge another cell's extent into this one (used by histogram merge).
    ///
    /// Ids and ranges are expected to match; callers merge cells addressed
    /// by the same `cellId`.
    pub fn merge_extent(&mut self, other: &Self) {
        debug_assert_eq!(self.id, other.id);
        self.extent = self.extent.extend(&other.extent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_extent_equals_range() {
        let r = NRectRange::xyxy(0.0, 0.0, 1.0, 1.0);
        let c = Cell::new(0, r.clone());
        assert_eq!(c.extent(), &r);
    }

    #[test]
    fn extend_extent_grows_but_keeps_range() {
        let r = NRectRange::xyxy(0.0, 0.0, 1.0, 1.0);
        let mut c = Cell::new(0, r.clone());
        c.extend_extent(&NRectRange::xyxy(0.2, 0.2, 1.5, 0.9));
        assert_eq!(c.range(), &r);
        assert_eq!(c.extent(), &NRectRange::xyxy(0.0, 0.0, 1.5, 1.0));
    }
}
