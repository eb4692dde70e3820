// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cost-based binary space partitioner (`spec.md` §4.3).

use std::collections::VecDeque;

use stark_histogram::{CellHistogram, CostTable, HistogramConfig, Universe};
use stark_types::{Cell, NRectRange, STObject, StarkError, StarkResult};

use crate::Partitioner;

/// Parameters needed to build a [`BspPartitioner`].
///
/// `side` is the square cell side length the partitioner's internal
/// histogram is built with; every split boundary is a multiple of `side`
/// from the universe's own origin.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BspConfig {
    /// The bounded universe.
    pub universe: Universe,
    /// Square cell side length.
    pub side: f64,
    /// Upper bound a partition's cost should approximate.
    pub max_cost: u64,
    /// Whether partition extents are kept equal to their range (points-only).
    pub points_only: bool,
    /// If the number of non-empty cells is at or below this threshold, skip
    /// the recursive split and emit one partition per non-empty cell.
    pub num_cell_threshold: usize,
}

impl BspConfig {
    /// Validate parameters, failing fast with [`StarkError::Config`].
    pub fn validate(&self) -> StarkResult<()> {
        if self.side <= 0.0 {
            return Err(StarkError::config("side", "must be > 0"));
        }
        if self.max_cost == 0 {
            return Err(StarkError::config("max_cost", "must be > 0"));
        }
        self.universe.validate()?;
        Ok(())
    }

    fn histogram_config(&self) -> HistogramConfig {
        HistogramConfig {
            universe: self.universe,
            x_len: self.side,
            y_len: self.side,
            points_only: self.points_only,
        }
    }
}

/// A list of spatial partitions produced by recursively cost-balancing a
/// bounded universe against a cell histogram.
#[derive(Clone, Debug)]
pub struct BspPartitioner {
    partitions: Vec<Cell>,
    costs: Vec<u64>,
}

impl BspPartitioner {
    /// Build a BSP partitioner by folding `objects` into a histogram and
    /// then recursively splitting the universe.
    pub fn build<'a>(
        config: BspConfig,
        objects: impl IntoIterator<Item = &'a STObject>,
    ) -> StarkResult<Self> {
        config.validate()?;
        let hist = CellHistogram::build(config.histogram_config(), objects)?;
        Self::build_from_histogram(config, &hist)
    }

    /// Build a BSP partitioner from an already-folded histogram (e.g. one
    /// assembled by a collaborator's `aggregate` tree-reduce).
    pub fn build_from_histogram(config: BspConfig, hist: &CellHistogram) -> StarkResult<Self> {
        config.validate()?;

        let non_empty = hist.non_empty_cell_ids();
        if non_empty.len() <= config.num_cell_threshold {
            tracing::debug!(
                count = non_empty.len(),
                threshold = config.num_cell_threshold,
                "bsp emitting one partition per non-empty cell"
            );
            let costs = non_empty.iter().map(|&id| hist.count(id)).collect();
            let partitions = non_empty
                .into_iter()
                .enumerate()
                .map(|(i, id)| {
                    let cell = hist.cell(id);
                    Cell::new(i as u64, cell.range().clone())
                        .tap_extend(cell.extent())
                })
                .collect();
            return Ok(Self { partitions, costs });
        }

        let cost_table = CostTable::build(hist);
        let universe_range = NRectRange::xyxy(
            config.universe.min_x,
            config.universe.min_y,
            config.universe.max_x_open(),
            config.universe.max_y_open(),
        );

        let mut queue = VecDeque::new();
        queue.push_back(universe_range);
        let mut emitted = Vec::new();

        while let Some(range) = queue.pop_front() {
            let span = tracing::debug_span!("bsp_split", volume = range.volume());
            let _guard = span.enter();

            let (cx0, cy0, cx1, cy1) = cell_bounds(&config.universe, config.side, &range);
            let cost = cost_table.query(cx0, cy0, cx1, cy1);
            let single_cell = (cx1 - cx0) <= 1 && (cy1 - cy0) <= 1;

            if cost <= config.max_cost || single_cell {
                tracing::trace!(cost, single_cell, "bsp emitting terminal partition");
                emitted.push((range, cost));
                continue;
            }

            let (below, above) = cost_based_split(&config.universe, config.side, &cost_table, &range);
            queue.push_back(below);
            queue.push_back(above);
        }

        let costs = emitted.iter().map(|(_, cost)| *cost).collect();
        let partitions = emitted
            .into_iter()
            .enumerate()
            .map(|(i, (range, _))| {
                let extent = partition_extent(hist, &config, &range);
                Cell::new(i as u64, range).tap_extend(&extent)
            })
            .collect();

        tracing::debug!(count = partitions.len(), "bsp finished recursive split");
        Ok(Self { partitions, costs })
    }
}

impl Partitioner for BspPartitioner {
    fn num_partitions(&self) -> u32 {
        self.partitions.len() as u32
    }

    fn get_partition_id(&self, key: &STObject) -> StarkResult<u32> {
        let centroid = key.geom().centroid();
        self.partitions
            .iter()
            .position(|cell| cell.range().contains_point(&stark_types::NPoint::xy(centroid.x, centroid.y)))
            .map(|i| i as u32)
            .ok_or_else(|| StarkError::out_of_universe(centroid.x, centroid.y))
    }

    fn partition_bounds(&self, id: u32) -> &Cell {
        &self.partitions[id as usize]
    }

    fn is_empty(&self, id: u32) -> bool {
        self.costs[id as usize] == 0
    }
}

/// Cell-index bounds `[cx0, cx1) x [cy0, cy1)` of `range`, assuming `range`'s
/// corners fall on multiples of `side` from `universe`'s own origin (true of
/// every range this module produces).
fn cell_bounds(universe: &Universe, side: f64, range: &NRectRange) -> (usize, usize, usize, usize) {
    let cx0 = ((range.ll().x() - universe.min_x) / side).round() as usize;
    let cy0 = ((range.ll().y() - universe.min_y) / side).round() as usize;
    let cx1 = ((range.ur().x() - universe.min_x) / side).round() as usize;
    let cy1 = ((range.ur().y() - universe.min_y) / side).round() as usize;
    (cx0, cy0, cx1, cy1)
}

/// Find the (dim, interior boundary) minimizing `|cost(below) - cost(above)|`,
/// tie-broken by lexicographic `(dim, boundary_index)` order.
fn cost_based_split(
    universe: &Universe,
    side: f64,
    cost_table: &CostTable,
    range: &NRectRange,
) -> (NRectRange, NRectRange) {
    let (cx0, cy0, cx1, cy1) = cell_bounds(universe, side, range);
    let cells_in_dim = [cx1 - cx0, cy1 - cy0];

    let mut best: Option<(u64, NRectRange, NRectRange)> = None;
    for d in 0..2 {
        let n = cells_in_dim[d];
        if n <= 1 {
            continue;
        }
        for i in 1..n {
            let boundary = range.ll().get(d) + i as f64 * side;
            let (below, above) = range.diff(d, boundary);
            let (bx0, by0, bx1, by1) = cell_bounds(universe, side, &below);
            let (ax0, ay0, ax1, ay1) = cell_bounds(universe, side, &above);
            let c1 = cost_table.query(bx0, by0, bx1, by1);
            let c2 = cost_table.query(ax0, ay0, ax1, ay1);
            let score = c1.abs_diff(c2);

            let is_better = match &best {
                None => true,
                Some((best_score, _, _)) => score < *best_score,
            };
            if is_better {
                best = Some((score, below, above));
            }
        }
    }

    let (_, below, above) = best.expect("a range with more than one cell has at least one splittable dimension");
    (below, above)
}

/// The union of every histogram cell extent covered by `range`, matching
/// the "incremental computation is permitted" latitude in `spec.md` §4.3.
/// For `points_only` configs this is just `range` itself.
fn partition_extent(hist: &CellHistogram, config: &BspConfig, range: &NRectRange) -> NRectRange {
    if config.points_only {
        return range.clone();
    }
    let (cx0, cy0, cx1, cy1) = cell_bounds(&config.universe, config.side, range);
    let mut extent: Option<NRectRange> = None;
    for cy in cy0..cy1 {
        for cx in cx0..cx1 {
            let id = (cy * hist.num_x_cells() + cx) as u64;
            let cell_extent = hist.cell(id).extent();
            extent = Some(match extent {
                None => cell_extent.clone(),
                Some(acc) => acc.extend(cell_extent),
            });
        }
    }
    extent.unwrap_or_else(|| range.clone())
}

/// Small chaining helper so partition construction reads as one expression.
trait TapExtend {
    fn tap_extend(self, envelope: &NRectRange) -> Self;
}

impl TapExtend for Cell {
    fn tap_extend(mut self, envelope: &NRectRange) -> Self {
        self.extend_extent(envelope);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stark_geometry::GeoType;

    fn hot_corner_histogram() -> CellHistogram {
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

    fn bsp_config() -> BspConfig {
        BspConfig {
            universe: Universe::new(0.0, 10.0, 0.0, 10.0),
            side: 1.0,
            max_cost: 100,
            points_only: true,
            num_cell_threshold: 0,
        }
    }

    #[test]
    fn invariants_hold_for_hot_cell_scenario() {
        let hist = hot_corner_histogram();
        let bsp = BspPartitioner::build_from_histogram(bsp_config(), &hist).unwrap();

        // Every emitted partition satisfies cost <= maxCost OR single-cell.
        let cost_table = CostTable::build(&hist);
        let mut total_volume = 0.0;
        for id in 0..bsp.num_partitions() {
            let cell = bsp.partition_bounds(id);
            let (cx0, cy0, cx1, cy1) = cell_bounds(&bsp_config().universe, 1.0, cell.range());
            let cost = cost_table.query(cx0, cy0, cx1, cy1);
            let single_cell = (cx1 - cx0) <= 1 && (cy1 - cy0) <= 1;
            assert!(cost <= bsp_config().max_cost || single_cell);
            total_volume += cell.range().volume();
        }
        // Union covers the universe (areas sum to 100, disjointness is
        // structural since every split is a clean axis-aligned cut).
        assert_eq!(total_volume, 100.0);
    }

    #[test]
    fn num_cell_threshold_short_circuits_to_per_cell_partitions() {
        let hist = hot_corner_histogram();
        let mut config = bsp_config();
        config.num_cell_threshold = 5;
        let bsp = BspPartitioner::build_from_histogram(config, &hist).unwrap();
        assert_eq!(bsp.num_partitions(), 1);
        assert_eq!(bsp.partition_bounds(0).range(), &NRectRange::xyxy(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = bsp_config();
        config.max_cost = 0;
        assert!(config.validate().is_err());
    }
}
