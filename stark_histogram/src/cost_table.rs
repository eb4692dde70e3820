// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A 2-D summed-area table over a [`crate::CellHistogram`]'s counts.
//!
//! `cost(P)` for a BSP candidate range `P` is the sum of `H[c].count` over
//! every cell fully inside `P` (`spec.md` §4.3). Because BSP only ever
//! splits along cell boundaries, every candidate range's footprint is a
//! contiguous rectangle of whole cell indices, so a summed-area table turns
//! `cost(P)` into four array reads instead of an O(cells) re-scan per
//! candidate split.
//!
//! This generalizes the running-prefix-sum technique used elsewhere in this
//! codebase for 1-D extent accumulation to two dimensions, built eagerly
//! once per histogram rather than maintained lazily, since a histogram is
//! immutable after construction.

use crate::CellHistogram;

/// A 2-D summed-area (prefix sum) table over a histogram's per-cell counts.
#[derive(Clone, Debug)]
pub struct CostTable {
    num_x_cells: usize,
    num_y_cells: usize,
    // sums[(cy+1) * (num_x+1) + (cx+1)] = sum of counts over cells with
    // index < (cx, cy) in both dimensions (standard inclusive-exclusive SAT
    // layout with a zero border).
    sums: Vec<u64>,
}

impl CostTable {
    /// Build a summed-area table from a histogram's counts.
    pub fn build(hist: &CellHistogram) -> Self {
        let nx = hist.num_x_cells();
        let ny = hist.num_y_cells();
        let stride = nx + 1;
        let mut sums = vec![0u64; stride * (ny + 1)];
        for cy in 0..ny {
            for cx in 0..nx {
                let id = (cy * nx + cx) as u64;
                let count = hist.count(id);
                let above = sums[cy * stride + (cx + 1)];
                let left = sums[(cy + 1) * stride + cx];
                let diag = sums[cy * stride + cx];
                sums[(cy + 1) * stride + (cx + 1)] = count + above + left - diag;
            }
        }
        Self {
            num_x_cells: nx,
            num_y_cells: ny,
            sums,
        }
    }

    /// Sum of counts over the half-open cell-index rectangle
    /// `[cx0, cx1) x [cy0, cy1)`. Clamped to the table's bounds; an empty or
    /// inverted range yields `0`.
    pub fn query(&self, cx0: usize, cy0: usize, cx1: usize, cy1: usize) -> u64 {
        let cx1 = cx1.min(self.num_x_cells);
        let cy1 = cy1.min(self.num_y_cells);
        if cx0 >= cx1 || cy0 >= cy1 {
            return 0;
        }
        let stride = self.num_x_cells + 1;
        let a = self.sums[cy1 * stride + cx1];
        let b = self.sums[cy0 * stride + cx1];
        let c = self.sums[cy1 * stride + cx0];
        let d = self.sums[cy0 * stride + cx0];
        a - b - c + d
    }

    /// The grand total (sum over the entire table); equals the histogram's
    /// `total_count()`.
    pub fn total(&self) -> u64 {
        self.query(0, 0, self.num_x_cells, self.num_y_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HistogramConfig, Universe};
    use stark_geometry::GeoType;
    use stark_types::STObject;

    fn hist_10x10_hot_corner() -> CellHistogram {
        let config = HistogramConfig {
            universe: Universe::new(0.0, 10.0, 0.0, 10.0),
            x_len: 1.0,
            y_len: 1.0,
            points_only: true,
        };
        let objs: Vec<STObject> = (0..1000)
            .map(|_| STObject::spatial(GeoType::point(0.5, 0.5)))
            .collect();
        CellHistogram::build(config, &objs).unwrap()
    }

    #[test]
    fn full_query_matches_total_count() {
        let hist = hist_10x10_hot_corner();
        let table = CostTable::build(&hist);
        assert_eq!(table.total(), hist.total_count());
        assert_eq!(table.total(), 1000);
    }

    #[test]
    fn single_hot_cell_isolated() {
        let hist = hist_10x10_hot_corner();
        let table = CostTable::build(&hist);
        assert_eq!(table.query(0, 0, 1, 1), 1000);
        assert_eq!(table.query(1, 0, 10, 10), 0);
        assert_eq!(table.query(0, 1, 10, 10), 0);
    }

    #[test]
    fn empty_or_inverted_range_is_zero() {
        let hist = hist_10x10_hot_corner();
        let table = CostTable::build(&hist);
        assert_eq!(table.query(5, 5, 5, 5), 0);
        assert_eq!(table.query(5, 5, 2, 2), 0);
    }
}
