// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid partitioner (`spec.md` §4.2).

use stark_histogram::{CellHistogram, HistogramConfig, Universe};
use stark_types::{Cell, STObject, StarkError, StarkResult};

use crate::Partitioner;

/// How a [`GridPartitioner`]'s cell resolution is chosen.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridSizing {
    /// `numXCells == numYCells == points_per_dim`; cell side lengths are
    /// derived from the universe's width/height.
    PointsPerDim {
        /// The target number of cells along each axis.
        points_per_dim: usize,
    },
    /// A fixed cell side length per axis.
    FixedSide {
        /// Cell side length along x.
        x_len: f64,
        /// Cell side length along y.
        y_len: f64,
    },
}

/// Parameters needed to build a [`GridPartitioner`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// The bounded universe.
    pub universe: Universe,
    /// The grid's resolution.
    pub sizing: GridSizing,
    /// Whether cell extents are kept equal to their range (points-only).
    pub points_only: bool,
}

impl GridConfig {
    fn histogram_config(&self) -> StarkResult<HistogramConfig> {
        let (x_len, y_len) = match self.sizing {
            GridSizing::PointsPerDim { points_per_dim } => {
                if points_per_dim == 0 {
                    return Err(StarkError::config("points_per_dim", "must be > 0"));
                }
                (
                    self.universe.width() / points_per_dim as f64,
                    self.universe.height() / points_per_dim as f64,
                )
            }
            GridSizing::FixedSide { x_len, y_len } => (x_len, y_len),
        };
        Ok(HistogramConfig {
            universe: self.universe,
            x_len,
            y_len,
            points_only: self.points_only,
        })
    }
}

/// A uniform grid over a bounded universe. `getPartition(key)` routes by the
/// cell id of `key`'s centroid; `isEmpty(id)` reports whether any folded
/// object has ever landed in that cell.
#[derive(Clone, Debug)]
pub struct GridPartitioner {
    hist: CellHistogram,
    ever_assigned: Vec<bool>,
}

impl GridPartitioner {
    /// Build a grid partitioner by folding `objects` into a cell histogram.
    pub fn build<'a>(
        config: GridConfig,
        objects: impl IntoIterator<Item = &'a STObject>,
    ) -> StarkResult<Self> {
        let hist = CellHistogram::build(config.histogram_config()?, objects)?;
        let ever_assigned = hist.cells().map(|(_, count)| count > 0).collect();
        tracing::debug!(
            num_x_cells = hist.num_x_cells(),
            num_y_cells = hist.num_y_cells(),
            "built grid partitioner"
        );
        Ok(Self { hist, ever_assigned })
    }

    /// The underlying histogram, e.g. for callers that also want per-cell counts.
    pub fn histogram(&self) -> &CellHistogram {
        &self.hist
    }
}

impl Partitioner for GridPartitioner {
    fn num_partitions(&self) -> u32 {
        (self.hist.num_x_cells() * self.hist.num_y_cells()) as u32
    }

    fn get_partition_id(&self, key: &STObject) -> StarkResult<u32> {
        let centroid = key.geom().centroid();
        self.hist.cell_id(centroid.x, centroid.y).map(|id| id as u32)
    }

    fn partition_bounds(&self, id: u32) -> &Cell {
        self.hist.cell(id as u64)
    }

    fn is_empty(&self, id: u32) -> bool {
        !self.ever_assigned[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stark_geometry::GeoType;

    fn universe() -> Universe {
        Universe::new(0.0, 10.0, 0.0, 10.0)
    }

    #[test]
    fn fixed_side_routes_by_centroid_cell() {
        let objs = vec![STObject::spatial(GeoType::point(3.5, 2.1))];
        let grid = GridPartitioner::build(
            GridConfig {
                universe: universe(),
                sizing: GridSizing::FixedSide { x_len: 1.0, y_len: 1.0 },
                points_only: true,
            },
            &objs,
        )
        .unwrap();
        let id = grid.get_partition_id(&objs[0]).unwrap();
        assert_eq!(id, 23);
        assert!(!grid.is_empty(id));
        assert!(grid.is_empty(0));
    }

    #[test]
    fn points_per_dim_derives_cell_size() {
        let grid = GridPartitioner::build(
            GridConfig {
                universe: universe(),
                sizing: GridSizing::PointsPerDim { points_per_dim: 5 },
                points_only: true,
            },
            &[],
        )
        .unwrap();
        assert_eq!(grid.num_partitions(), 25);
    }

    #[test]
    fn out_of_universe_key_is_domain_error() {
        let grid = GridPartitioner::build(
            GridConfig {
                universe: universe(),
                sizing: GridSizing::FixedSide { x_len: 1.0, y_len: 1.0 },
                points_only: true,
            },
            &[],
        )
        .unwrap();
        let outside = STObject::spatial(GeoType::point(10.0, 10.0));
        assert!(grid.get_partition_id(&outside).is_err());
    }
}
