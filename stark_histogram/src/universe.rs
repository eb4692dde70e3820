// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bounded universe a histogram and its derived partitioners operate over.

use stark_types::{StarkError, StarkResult};

/// A 2-D axis-aligned universe, right-open on its declared max bounds:
/// `[min_x, max_x) x [min_y, max_y)`. A point exactly on `max_x` or `max_y`
/// is outside the universe (`spec.md` §4.1 / §8 scenario 2).
///
/// The `EPS` widening documented in `spec.md` §6 is applied one level down,
/// to individual cell and partition ranges derived from this universe, to
/// absorb floating-point rounding in `numXCells * xLen` so the last row/column
/// of cells still exactly covers the universe's own true edge.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Universe {
    /// Inclusive minimum x.
    pub min_x: f64,
    /// Exclusive maximum x.
    pub max_x: f64,
    /// Inclusive minimum y.
    pub min_y: f64,
    /// Exclusive maximum y.
    pub max_y: f64,
}

impl Universe {
    /// Construct a universe from its declared bounds.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Validate that the universe is well-formed.
    pub fn validate(&self) -> StarkResult<()> {
        if self.max_x <= self.min_x {
            return Err(StarkError::config("universe", "max_x must be > min_x"));
        }
        if self.max_y <= self.min_y {
            return Err(StarkError::config("universe", "max_y must be > min_y"));
        }
        Ok(())
    }

    /// The universe's own declared maximum x (no `EPS` widening: this is the
    /// true outer edge, exclusive).
    pub fn max_x_open(&self) -> f64 {
        self.max_x
    }

    /// The universe's own declared maximum y (no `EPS` widening: this is the
    /// true outer edge, exclusive).
    pub fn max_y_open(&self) -> f64 {
        self.max_y
    }

    /// The universe's width.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// The universe's height.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether `(x, y)` lies inside this universe under right-open semantics.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_boundary_point_is_out_of_range() {
        let u = Universe::new(0.0, 10.0, 0.0, 10.0);
        assert!(u.contains_point(9.999999, 9.999999));
        // The declared max is excluded (right-open): (10, 10) is out of range.
        assert!(!u.contains_point(10.0, 10.0));
        assert!(!u.contains_point(10.1, 10.0));
    }

    #[test]
    fn invalid_universe_is_rejected() {
        let u = Universe::new(10.0, 10.0, 0.0, 10.0);
        assert!(u.validate().is_err());
    }
}
