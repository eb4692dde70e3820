// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `STObject`: a geometry paired with an optional temporal expression.

use stark_geometry::GeoType;

use crate::TemporalExpr;

/// A spatio-temporal value: a geometry plus an optional temporal expression.
///
/// A binary predicate holds between two `STObject`s iff the spatial predicate
/// holds between their geometries **and** either both sides lack a temporal
/// expression, or both have one and the temporal predicate also holds. If
/// exactly one side carries a temporal expression, the composed predicate is
/// `false` (`spec.md` §3).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct STObject {
    geom: GeoType,
    time: Option<TemporalExpr>,
}

/// The spatio-temporal predicates STARK's operators dispatch over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Predicate {
    /// Geometries (and, if present, times) overlap.
    Intersects,
    /// `self` fully contains `other`.
    Contains,
    /// `self` is fully contained by `other`.
    ContainedBy,
    /// `self` covers `other` (boundary-inclusive containment).
    Covers,
    /// `self` is covered by `other`.
    CoveredBy,
    /// `self` lies within `max_dist` of `other` (spatial-only; time, if
    /// present on both sides, must still intersect).
    WithinDistance {
        /// The maximum allowed distance.
        max_dist: f64,
    },
}

impl STObject {
    /// Build a purely spatial value (no temporal component).
    pub fn spatial(geom: GeoType) -> Self {
        Self { geom, time: None }
    }

    /// Build a spatio-temporal value.
    pub fn new(geom: GeoType, time: TemporalExpr) -> Self {
        Self {
            geom,
            time: Some(time),
        }
    }

    /// The geometry component.
    pub fn geom(&self) -> &GeoType {
        &self.geom
    }

    /// The optional temporal component.
    pub fn time(&self) -> Option<&TemporalExpr> {
        self.time.as_ref()
    }

    fn temporal_holds(&self, other: &Self, spatial_time_op: impl Fn(&TemporalExpr, &TemporalExpr) -> bool) -> bool {
        match (&self.time, &other.time) {
            (None, None) => true,
            (Some(a), Some(b)) => spatial_time_op(a, b),
            _ => false,
        }
    }

    /// Whether `self` and `other` intersect (spatially, and temporally if
    /// both carry time).
    pub fn intersects(&self, other: &Self) -> bool {
        self.geom.intersects(&other.geom)
            && self.temporal_holds(other, TemporalExpr::intersects)
    }

    /// Whether `self` contains `other`.
    pub fn contains(&self, other: &Self) -> bool {
        self.geom.contains(&other.geom) && self.temporal_holds(other, TemporalExpr::contains)
    }

    /// Whether `self` is contained by `other`. Equivalent to `other.contains(self)`.
    pub fn contained_by(&self, other: &Self) -> bool {
        other.contains(self)
    }

    /// Whether `self` covers `other`.
    pub fn covers(&self, other: &Self) -> bool {
        self.geom.covers(&other.geom) && self.temporal_holds(other, TemporalExpr::contains)
    }

    /// Whether `self` is covered by `other`. Equivalent to `other.covers(self)`.
    pub fn covered_by(&self, other: &Self) -> bool {
        other.covers(self)
    }

    /// Whether `self` lies within `max_dist` of `other`.
    pub fn within_distance(&self, other: &Self, max_dist: f64) -> bool {
        self.geom.distance(&other.geom) <= max_dist
            && self.temporal_holds(other, TemporalExpr::intersects)
    }

    /// Evaluate an arbitrary [`Predicate`] between `self` and `other`.
    pub fn evaluate(&self, other: &Self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Intersects => self.intersects(other),
            Predicate::Contains => self.contains(other),
            Predicate::ContainedBy => self.contained_by(other),
            Predicate::Covers => self.covers(other),
            Predicate::CoveredBy => self.covered_by(other),
            Predicate::WithinDistance { max_dist } => self.within_distance(other, *max_dist),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> GeoType {
        GeoType::point(x, y)
    }

    #[test]
    fn contains_implies_covered_by_inverse() {
        let a = STObject::spatial(GeoType::rect(0.0, 0.0, 10.0, 10.0));
        let b = STObject::spatial(pt(5.0, 5.0));
        assert!(a.contains(&b));
        assert!(b.covered_by(&a));
    }

    #[test]
    fn one_sided_time_never_intersects() {
        let a = STObject::new(pt(0.0, 0.0), TemporalExpr::interval(10, 20));
        let c = STObject::spatial(pt(0.0, 0.0));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn both_timeless_intersects_on_spatial_alone() {
        let a = STObject::spatial(pt(0.0, 0.0));
        let b = STObject::spatial(pt(0.0, 0.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn both_with_time_requires_temporal_overlap() {
        let a = STObject::new(pt(0.0, 0.0), TemporalExpr::interval(10, 20));
        let b = STObject::new(pt(0.0, 0.0), TemporalExpr::interval(15, 25));
        assert!(a.intersects(&b));

        let c = STObject::new(pt(0.0, 0.0), TemporalExpr::interval(25, 30));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn intersects_is_symmetric() {
        let a = STObject::spatial(GeoType::rect(-73.0, 40.0, -70.0, 41.0));
        let b = STObject::spatial(pt(-71.5, 40.5));
        assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn contains_implies_intersects_for_nonempty() {
        let a = STObject::spatial(GeoType::rect(0.0, 0.0, 10.0, 10.0));
        let b = STObject::spatial(GeoType::rect(1.0, 1.0, 2.0, 2.0));
        assert!(a.contains(&b));
        assert!(a.intersects(&b));
    }
}
