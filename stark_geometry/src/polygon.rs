// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal simple-polygon support backing [`crate::GeoType::Polygon`].

use kurbo::{Point, Rect};

/// A simple polygon given as an ordered ring of vertices.
///
/// The ring is not required to repeat its first vertex; edges are taken
/// between consecutive vertices and between the last and first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon from an iterator of vertices.
    pub fn new(vertices: impl IntoIterator<Item = Point>) -> Self {
        Self {
            vertices: vertices.into_iter().collect(),
        }
    }

    /// Iterate over the polygon's vertices in ring order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().copied()
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub(crate) fn envelope(&self) -> Rect {
        let mut it = self.vertices.iter();
        let first = it.next().copied().unwrap_or_default();
        let mut r = Rect::new(first.x, first.y, first.x, first.y);
        for p in it {
            r = r.union_pt(*p);
        }
        r
    }

    pub(crate) fn centroid(&self) -> Point {
        let n = self.vertices.len();
        if n == 0 {
            return Point::ZERO;
        }
        if n < 3 {
            let sum = self
                .vertices
                .iter()
                .fold((0.0, 0.0), |acc, p| (acc.0 + p.x, acc.1 + p.y));
            return Point::new(sum.0 / n as f64, sum.1 / n as f64);
        }
        let (mut cx, mut cy, mut area2) = (0.0, 0.0, 0.0);
        for (a, b) in self.edges() {
            let cross = a.x * b.y - b.x * a.y;
            area2 += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        if area2.abs() < f64::EPSILON {
            // Degenerate (zero-area) polygon: fall back to the vertex average.
            let sum = self
                .vertices
                .iter()
                .fold((0.0, 0.0), |acc, p| (acc.0 + p.x, acc.1 + p.y));
            return Point::new(sum.0 / n as f64, sum.1 / n as f64);
        }
        let factor = 1.0 / (3.0 * area2);
        Point::new(cx * factor, cy * factor)
    }

    /// Standard ray-casting point-in-polygon test (boundary not guaranteed included).
    pub(crate) fn contains_point(&self, p: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            let crosses_y = (a.y > p.y) != (b.y > p.y);
            if crosses_y {
                let x_at_y = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_at_y {
                    inside = !inside;
                }
            }
        }
        inside || self.boundary_contains_point(p)
    }

    pub(crate) fn boundary_contains_point(&self, p: Point) -> bool {
        self.edges().any(|(a, b)| point_on_segment(p, a, b))
    }

    pub(crate) fn intersects_rect(&self, r: &Rect) -> bool {
        if self.points().any(|p| rect_contains_point(r, &p)) {
            return true;
        }
        let corners = [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ];
        if corners.iter().any(|c| self.contains_point(*c)) {
            return true;
        }
        let rect_edges = [
            (corners[0], corners[1]),
            (corners[1], corners[2]),
            (corners[2], corners[3]),
            (corners[3], corners[0]),
        ];
        self.edges()
            .any(|pe| rect_edges.iter().any(|re| segments_intersect(pe.0, pe.1, re.0, re.1)))
    }

    pub(crate) fn contains_rect(&self, r: &Rect) -> bool {
        let corners = [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ];
        corners.iter().all(|c| self.contains_point(*c))
    }

    pub(crate) fn intersects_polygon(&self, other: &Self) -> bool {
        if self.points().any(|p| other.contains_point(p)) {
            return true;
        }
        if other.points().any(|p| self.contains_point(p)) {
            return true;
        }
        self.edges().any(|a| {
            other
                .edges()
                .any(|b| segments_intersect(a.0, a.1, b.0, b.1))
        })
    }

    pub(crate) fn distance_to_point(&self, p: Point) -> f64 {
        if self.contains_point(p) {
            return 0.0;
        }
        self.edges()
            .map(|(a, b)| point_segment_distance(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    pub(crate) fn distance_to_rect(&self, r: &Rect) -> f64 {
        if self.intersects_rect(r) {
            return 0.0;
        }
        let corners = [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ];
        let rect_edges = [
            (corners[0], corners[1]),
            (corners[1], corners[2]),
            (corners[2], corners[3]),
            (corners[3], corners[0]),
        ];
        let mut best = f64::INFINITY;
        for v in self.points() {
            best = best.min(point_rect_distance(&v, r));
        }
        for c in corners {
            best = best.min(self.distance_to_point(c));
        }
        for (a, b) in self.edges() {
            for (c, d) in rect_edges {
                best = best.min(segment_segment_distance(a, b, c, d));
            }
        }
        best
    }

    pub(crate) fn distance_to_polygon(&self, other: &Self) -> f64 {
        if self.intersects_polygon(other) {
            return 0.0;
        }
        let mut best = f64::INFINITY;
        for a in self.edges() {
            for b in other.edges() {
                best = best.min(segment_segment_distance(a.0, a.1, b.0, b.1));
            }
        }
        best
    }
}

fn rect_contains_point(r: &Rect, p: &Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

fn point_rect_distance(p: &Point, r: &Rect) -> f64 {
    let dx = (r.x0 - p.x).max(0.0).max(p.x - r.x1);
    let dy = (r.y0 - p.y).max(0.0).max(p.y - r.y1);
    dx.hypot(dy)
}

fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x);
    if cross.abs() > 1e-9 {
        return false;
    }
    let dot = (p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y);
    let len2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    dot >= 0.0 && dot <= len2
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = orientation(p3, p4, p1);
    let d2 = orientation(p3, p4, p2);
    let d3 = orientation(p1, p2, p3);
    let d4 = orientation(p1, p2, p4);

    if ((d1 > 0.0) != (d2 > 0.0)) && ((d3 > 0.0) != (d4 > 0.0)) {
        return true;
    }
    point_on_segment(p1, p3, p4)
        || point_on_segment(p2, p3, p4)
        || point_on_segment(p3, p1, p2)
        || point_on_segment(p4, p1, p2)
}

fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let len2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if len2 < f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len2).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    p.distance(proj)
}

fn segment_segment_distance(a: Point, b: Point, c: Point, d: Point) -> f64 {
    if segments_intersect(a, b, c, d) {
        return 0.0;
    }
    [
        point_segment_distance(a, c, d),
        point_segment_distance(b, c, d),
        point_segment_distance(c, a, b),
        point_segment_distance(d, a, b),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}
