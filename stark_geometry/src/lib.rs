// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thin geometry façade used by the rest of STARK.
//!
//! The spatial partitioning and indexing core treats geometry predicates as a
//! black box: it only ever calls `envelope`, `intersects`, `contains`,
//! `covers`, `covered_by`, `distance`, and `centroid`. This crate supplies
//! those operations on top of [`kurbo`] so the core never has to special-case
//! a concrete geometry representation.
//!
//! [`GeoType`] supports the three shapes the rest of the workspace's test
//! fixtures and the spec's worked examples need: points, axis-aligned
//! rectangles, and simple (not necessarily convex) polygons given as a closed
//! ring of points.

use kurbo::{Point, Rect};

mod polygon;
pub use polygon::Polygon;

/// A spatial value: point, axis-aligned rectangle, or simple polygon.
///
/// Equality is structural on coordinates, matching `spec.md`'s data model for
/// `GeoType`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeoType {
    /// A single point.
    Point(Point),
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A simple polygon given as an ordered ring of vertices (not required to
    /// repeat the first vertex at the end).
    Polygon(Polygon),
}

impl GeoType {
    /// Convenience constructor for a point geometry.
    pub fn point(x: f64, y: f64) -> Self {
        Self::Point(Point::new(x, y))
    }

    /// Convenience constructor for a rectangle geometry.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Rect(Rect::new(x0, y0, x1, y1))
    }

    /// Convenience constructor for a polygon geometry from raw coordinate pairs.
    pub fn polygon(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::Polygon(Polygon::new(
            points.into_iter().map(|(x, y)| Point::new(x, y)),
        ))
    }

    /// The minimum bounding rectangle of this geometry.
    pub fn envelope(&self) -> Rect {
        match self {
            Self::Point(p) => Rect::new(p.x, p.y, p.x, p.y),
            Self::Rect(r) => *r,
            Self::Polygon(poly) => poly.envelope(),
        }
    }

    /// The centroid of this geometry.
    ///
    /// For a point this is the point itself; for a rectangle the center; for
    /// a polygon the signed-area centroid (falling back to the vertex average
    /// for degenerate zero-area polygons).
    pub fn centroid(&self) -> Point {
        match self {
            Self::Point(p) => *p,
            Self::Rect(r) => r.center(),
            Self::Polygon(poly) => poly.centroid(),
        }
    }

    /// Whether `self` and `other` share any point.
    pub fn intersects(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a == b,
            (Self::Point(p), Self::Rect(r)) | (Self::Rect(r), Self::Point(p)) => {
                rect_contains_point(r, p)
            }
            (Self::Rect(a), Self::Rect(b)) => rects_overlap(a, b),
            (Self::Point(p), Self::Polygon(poly)) | (Self::Polygon(poly), Self::Point(p)) => {
                poly.contains_point(*p) || poly.boundary_contains_point(*p)
            }
            (Self::Rect(r), Self::Polygon(poly)) | (Self::Polygon(poly), Self::Rect(r)) => {
                poly.intersects_rect(r)
            }
            (Self::Polygon(a), Self::Polygon(b)) => a.intersects_polygon(b),
        }
    }

    /// Whether `self` fully contains `other` (boundary-inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a == b,
            (Self::Point(_), _) => false,
            (Self::Rect(r), Self::Point(p)) => rect_contains_point(r, p),
            (Self::Rect(a), Self::Rect(b)) => rect_contains_rect(a, b),
            (Self::Rect(r), Self::Polygon(poly)) => {
                poly.points().all(|p| rect_contains_point(r, &p))
            }
            (Self::Polygon(poly), Self::Point(p)) => poly.contains_point(*p),
            (Self::Polygon(poly), Self::Rect(r)) => poly.contains_rect(r),
            (Self::Polygon(a), Self::Polygon(b)) => b.points().all(|p| a.contains_point(p)),
        }
    }

    /// Whether `other` fully contains `self`. Equivalent to `other.contains(self)`.
    pub fn covered_by(&self, other: &Self) -> bool {
        other.contains(self)
    }

    /// Whether `self` fully contains `other`, including shared boundary.
    ///
    /// For this façade `covers` and `contains` coincide because boundary
    /// points are always considered contained (there is no distinct "strict
    /// interior" containment in the supported shapes).
    pub fn covers(&self, other: &Self) -> bool {
        self.contains(other)
    }

    /// The Euclidean distance between the nearest points of `self` and `other`.
    ///
    /// Zero iff the geometries intersect.
    pub fn distance(&self, other: &Self) -> f64 {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a.distance(*b),
            (Self::Point(p), Self::Rect(r)) | (Self::Rect(r), Self::Point(p)) => {
                point_rect_distance(p, r)
            }
            (Self::Rect(a), Self::Rect(b)) => rect_rect_distance(a, b),
            (Self::Point(p), Self::Polygon(poly)) | (Self::Polygon(poly), Self::Point(p)) => {
                poly.distance_to_point(*p)
            }
            (Self::Rect(r), Self::Polygon(poly)) | (Self::Polygon(poly), Self::Rect(r)) => {
                poly.distance_to_rect(r)
            }
            (Self::Polygon(a), Self::Polygon(b)) => a.distance_to_polygon(b),
        }
    }

    /// The coordinate sequence of this geometry (for structural comparisons).
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        match self {
            Self::Point(p) => vec![(p.x, p.y)],
            Self::Rect(r) => vec![
                (r.x0, r.y0),
                (r.x1, r.y0),
                (r.x1, r.y1),
                (r.x0, r.y1),
            ],
            Self::Polygon(poly) => poly.points().map(|p| (p.x, p.y)).collect(),
        }
    }
}

fn rect_contains_point(r: &Rect, p: &Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

fn rect_contains_rect(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x0 && a.y0 <= b.y0 && a.x1 >= b.x1 && a.y1 >= b.y1
}

fn point_rect_distance(p: &Point, r: &Rect) -> f64 {
    let dx = (r.x0 - p.x).max(0.0).max(p.x - r.x1);
    let dy = (r.y0 - p.y).max(0.0).max(p.y - r.y1);
    dx.hypot(dy)
}

fn rect_rect_distance(a: &Rect, b: &Rect) -> f64 {
    let dx = (b.x0 - a.x1).max(0.0).max(a.x0 - b.x1);
    let dy = (b.y0 - a.y1).max(0.0).max(a.y0 - b.y1);
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_equality_and_intersection() {
        let a = GeoType::point(1.0, 2.0);
        let b = GeoType::point(1.0, 2.0);
        let c = GeoType::point(1.0, 3.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn rect_contains_and_intersects() {
        let outer = GeoType::rect(0.0, 0.0, 10.0, 10.0);
        let inner = GeoType::rect(2.0, 2.0, 4.0, 4.0);
        assert!(outer.contains(&inner));
        assert!(inner.covered_by(&outer));
        assert!(outer.intersects(&inner));

        let disjoint = GeoType::rect(20.0, 20.0, 30.0, 30.0);
        assert!(!outer.intersects(&disjoint));
        assert_eq!(outer.distance(&disjoint), point_rect_distance_check());
    }

    fn point_rect_distance_check() -> f64 {
        // outer=[0,10]x[0,10], disjoint=[20,30]x[20,30]: nearest corners (10,10) and (20,20).
        ((20.0_f64 - 10.0).powi(2) * 2.0).sqrt()
    }

    #[test]
    fn contains_implies_intersects_when_nonempty() {
        let a = GeoType::rect(0.0, 0.0, 10.0, 10.0);
        let b = GeoType::rect(1.0, 1.0, 2.0, 2.0);
        assert!(a.contains(&b));
        assert!(a.intersects(&b));
    }

    #[test]
    fn polygon_point_containment() {
        let tri = GeoType::polygon([(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        let inside = GeoType::point(5.0, 3.0);
        let outside = GeoType::point(-5.0, -5.0);
        assert!(tri.contains(&inside));
        assert!(!tri.contains(&outside));
        assert!(tri.intersects(&inside));
        assert!(!tri.intersects(&outside));
    }

    #[test]
    fn envelope_and_centroid() {
        let r = GeoType::rect(0.0, 0.0, 4.0, 2.0);
        assert_eq!(r.envelope(), Rect::new(0.0, 0.0, 4.0, 2.0));
        let c = r.centroid();
        assert_eq!((c.x, c.y), (2.0, 1.0));
    }
}
