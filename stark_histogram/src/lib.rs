// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell histogram construction over a bounded universe (`spec.md` §4.1).
//!
//! A [`CellHistogram`] partitions a 2-D universe into a uniform grid of
//! `numXCells × numYCells` cells and folds a dataset into per-cell counts and
//! accumulated extents. It is built once per partitioner construction and
//! never mutated afterwards; [`CellHistogram::merge`] is associative and
//! commutative so the external collaborator can tree-reduce partial
//! histograms computed over data shards.
//!
//! A [`CostTable`] is a 2-D summed-area table over the histogram's counts,
//! giving the BSP partitioner O(1) `cost(range)` queries instead of
//! re-summing cells on every candidate split.

mod cost_table;
mod universe;

pub use cost_table::CostTable;
pub use universe::Universe;

use stark_types::{Cell, NPoint, NRectRange, STObject, StarkError, StarkResult};

/// Parameters needed to build a [`CellHistogram`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramConfig {
    /// The bounded universe (right-open on its max sides).
    pub universe: Universe,
    /// Cell side length along x.
    pub x_len: f64,
    /// Cell side length along y.
    pub y_len: f64,
    /// When `true`, cell extents are never widened past their range
    /// (`extent == range` is maintained, saving the per-object extend).
    pub points_only: bool,
}

impl HistogramConfig {
    /// Validate parameters, failing fast with [`StarkError::Config`].
    pub fn validate(&self) -> StarkResult<()> {
        if self.x_len <= 0.0 {
            return Err(StarkError::config("x_len", "must be > 0"));
        }
        if self.y_len <= 0.0 {
            return Err(StarkError::config("y_len", "must be > 0"));
        }
        self.universe.validate()?;
        Ok(())
    }

    /// Number of cells along x, rounded up so the universe is fully covered.
    pub fn num_x_cells(&self) -> usize {
        (self.universe.width() / self.x_len).ceil() as usize
    }

    /// Number of cells along y, rounded up so the universe is fully covered.
    pub fn num_y_cells(&self) -> usize {
        (self.universe.height() / self.y_len).ceil() as usize
    }
}

/// A fixed-size array of `(Cell, count)`, indexed by `cellId`.
#[derive(Clone, Debug)]
pub struct CellHistogram {
    config: HistogramConfig,
    num_x_cells: usize,
    num_y_cells: usize,
    cells: Vec<Cell>,
    counts: Vec<u64>,
}

impl CellHistogram {
    /// The "zero" element for an `aggregate`-shaped fold: every cell present,
    /// every count `0`, every extent equal to its cell's range.
    ///
    /// This is the collaborator-contract analogue of `spec.md §6`'s
    /// `aggregate(zero)(seq, comb)`.
    pub fn zero(config: HistogramConfig) -> StarkResult<Self> {
        config.validate()?;
        let num_x_cells = config.num_x_cells();
        let num_y_cells = config.num_y_cells();
        let mut cells = Vec::with_capacity(num_x_cells * num_y_cells);
        for cy in 0..num_y_cells {
            for cx in 0..num_x_cells {
                let id = (cy * num_x_cells + cx) as u64;
                let range = cell_range(&config, cx, cy);
                cells.push(Cell::new(id, range));
            }
        }
        let counts = vec![0u64; num_x_cells * num_y_cells];
        Ok(Self {
            config,
            num_x_cells,
            num_y_cells,
            cells,
            counts,
        })
    }

    /// Build a full histogram by folding every object in `objects` (the
    /// `seq` half of `aggregate`, applied to a fresh [`CellHistogram::zero`]).
    pub fn build<'a>(
        config: HistogramConfig,
        objects: impl IntoIterator<Item = &'a STObject>,
    ) -> StarkResult<Self> {
        let mut hist = Self::zero(config)?;
        for obj in objects {
            hist.fold_one(obj)?;
        }
        tracing::debug!(
            cells = hist.cells.len(),
            total = hist.total_count(),
            "built cell histogram"
        );
        Ok(hist)
    }

    /// Fold a single object into this histogram in place (the per-element
    /// `seq` step).
    pub fn fold_one(&mut self, obj: &STObject) -> StarkResult<()> {
        let centroid = obj.geom().centroid();
        let id = self.cell_id(centroid.x, centroid.y)?;
        self.counts[id as usize] += 1;
        if !self.config.points_only {
            let env = obj.geom().envelope();
            let envelope = NRectRange::xyxy(env.x0, env.y0, env.x1, env.y1);
            self.cells[id as usize].extend_extent(&envelope);
        }
        Ok(())
    }

    /// Merge another histogram into a new one (the `comb` half of
    /// `aggregate`). Associative and commutative (counts add; for
    /// non-point mode extents union; for point mode `extent == range` is
    /// preserved).
    pub fn merge(&self, other: &Self) -> Self {
        debug_assert_eq!(self.num_x_cells, other.num_x_cells);
        debug_assert_eq!(self.num_y_cells, other.num_y_cells);
        let mut cells = self.cells.clone();
        let mut counts = self.counts.clone();
        for i in 0..counts.len() {
            counts[i] += other.counts[i];
            if !self.config.points_only {
                cells[i].merge_extent(&other.cells[i]);
            }
        }
        Self {
            config: self.config.clone(),
            num_x_cells: self.num_x_cells,
            num_y_cells: self.num_y_cells,
            cells,
            counts,
        }
    }

    /// Compute the cell id for a point, failing if it lies outside the
    /// universe.
    pub fn cell_id(&self, x: f64, y: f64) -> StarkResult<u64> {
        if !self.config.universe.contains_point(x, y) {
            return Err(StarkError::out_of_universe(x, y));
        }
        let cx = ((x - self.config.universe.min_x) / self.config.x_len).floor() as usize;
        let cy = ((y - self.config.universe.min_y) / self.config.y_len).floor() as usize;
        let cx = cx.min(self.num_x_cells - 1);
        let cy = cy.min(self.num_y_cells - 1);
        Ok((cy * self.num_x_cells + cx) as u64)
    }

    /// Number of cells along x.
    pub fn num_x_cells(&self) -> usize {
        self.num_x_cells
    }

    /// Number of cells along y.
    pub fn num_y_cells(&self) -> usize {
        self.num_y_cells
    }

    /// The cell at `id`.
    pub fn cell(&self, id: u64) -> &Cell {
        &self.cells[id as usize]
    }

    /// The count at `id`.
    pub fn count(&self, id: u64) -> u64 {
        self.counts[id as usize]
    }

    /// All `(Cell, count)` pairs in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (&Cell, u64)> {
        self.cells.iter().zip(self.counts.iter().copied())
    }

    /// The total number of folded objects (`Σ counts`).
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// The configuration this histogram was built with.
    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    /// Ids of cells with a nonzero count.
    pub fn non_empty_cell_ids(&self) -> Vec<u64> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, _)| i as u64)
            .collect()
    }
}

fn cell_range(config: &HistogramConfig, cx: usize, cy: usize) -> NRectRange {
    let x0 = config.universe.min_x + cx as f64 * config.x_len;
    let y0 = config.universe.min_y + cy as f64 * config.y_len;
    let x1 = (x0 + config.x_len).min(config.universe.max_x_open());
    let y1 = (y0 + config.y_len).min(config.universe.max_y_open());
    NRectRange::new(NPoint::xy(x0, y0), NPoint::xy(x1, y1))
}
