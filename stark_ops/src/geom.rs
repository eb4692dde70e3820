// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small bridge between [`stark_geometry::GeoType`]'s `kurbo`-backed
//! envelope and the [`NRectRange`] partition pruning operates on.

use stark_types::{GeoType, NPoint, NRectRange};

/// The minimum bounding rectangle of `geom`, as an [`NRectRange`].
pub(crate) fn envelope(geom: &GeoType) -> NRectRange {
    let r = geom.envelope();
    NRectRange::new(NPoint::xy(r.x0, r.y0), NPoint::xy(r.x1, r.y1))
}

/// `envelope`, inflated by `dist` on every side (`spec.md` §4.5's
/// `WITHIN_DISTANCE` pruning clause).
pub(crate) fn inflate(envelope: &NRectRange, dist: f64) -> NRectRange {
    NRectRange::new(
        NPoint::xy(envelope.ll().x() - dist, envelope.ll().y() - dist),
        NPoint::xy(envelope.ur().x() + dist, envelope.ur().y() + dist),
    )
}
