// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `NPoint`: a point in `n` dimensions (practically `n == 2`).

use smallvec::SmallVec;

/// A point in `n` dimensions.
///
/// STARK's partitioners and histograms are specified over an arbitrary
/// dimension count, but every concrete usage in this workspace is 2-D. Coordinates
/// are stored inline for the `n <= 2` case via `SmallVec`, so building an
/// `NPoint` per grid cell or BSP split candidate doesn't heap-allocate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NPoint(SmallVec<[f64; 2]>);

impl NPoint {
    /// Construct a point from its per-dimension coordinates.
    pub fn new(coords: impl IntoIterator<Item = f64>) -> Self {
        Self(coords.into_iter().collect())
    }

    /// Construct a 2-D point. The common case in this workspace.
    pub fn xy(x: f64, y: f64) -> Self {
        Self(SmallVec::from_buf([x, y]))
    }

    /// The number of dimensions.
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// The coordinate along dimension `d`.
    pub fn get(&self, d: usize) -> f64 {
        self.0[d]
    }

    /// The coordinate slice.
    pub fn coords(&self) -> &[f64] {
        &self.0
    }

    /// The `x` coordinate, assuming `dims() >= 1`.
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    /// The `y` coordinate, assuming `dims() >= 2`.
    pub fn y(&self) -> f64 {
        self.0[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xy_accessors() {
        let p = NPoint::xy(1.5, 2.5);
        assert_eq!(p.dims(), 2);
        assert_eq!(p.x(), 1.5);
        assert_eq!(p.y(), 2.5);
        assert_eq!(p.get(0), 1.5);
    }
}
