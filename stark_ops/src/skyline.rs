// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Skyline (`spec.md` §4.8): a `Skyline<T>` accumulator plus three ways to
//! feed it — aggregate (fold everything into one accumulator), BBS-style
//! (grid-partition a 2-D distance projection and prune dominated cells), and
//! angular (partition by angle around a reference point).

use std::collections::HashMap;

use stark_types::{STObject, StarkResult, TemporalExpr};

use crate::cancellation::CancellationToken;
use crate::collaborator::Collaborator;

/// A set of mutually non-dominated values under a caller-supplied
/// `dominates(a, b)` ("`a` strictly dominates `b`").
///
/// Inserting a value that is dominated by an existing member is a no-op;
/// inserting a value that dominates existing members removes them.
#[derive(Clone, Debug)]
pub struct Skyline<T> {
    points: Vec<T>,
}

impl<T> Default for Skyline<T> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<T: Clone> Skyline<T> {
    /// An empty skyline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current non-dominated members.
    pub fn points(&self) -> &[T] {
        &self.points
    }

    /// Consume the accumulator, returning its members.
    pub fn into_vec(self) -> Vec<T> {
        self.points
    }

    /// Insert `candidate`: dropped if any existing member dominates it,
    /// otherwise kept and every member `candidate` dominates is removed.
    pub fn insert(&mut self, candidate: T, dominates: &impl Fn(&T, &T) -> bool) {
        if self.points.iter().any(|p| dominates(p, &candidate)) {
            return;
        }
        self.points.retain(|p| !dominates(&candidate, p));
        self.points.push(candidate);
    }

    /// Combine `other` into `self` by reinserting every one of `other`'s
    /// members. Associative and commutative up to dominance equivalence.
    pub fn merge(mut self, other: Self, dominates: &impl Fn(&T, &T) -> bool) -> Self {
        for p in other.points {
            self.insert(p, dominates);
        }
        self
    }
}

/// **Aggregate** flavor (`skylineAgg`): fold the whole dataset into a single
/// accumulator, partition by partition.
pub fn skyline_agg<C: Collaborator<STObject>>(
    data: &C,
    dominates: impl Fn(&STObject, &STObject) -> bool,
    token: &CancellationToken,
) -> StarkResult<Skyline<STObject>> {
    let partitioner = data.partitioner();
    let mut acc = Skyline::new();
    for id in 0..partitioner.num_partitions() {
        if partitioner.is_empty(id) {
            continue;
        }
        for obj in data.iterator(id, token) {
            token.check(Some(id))?;
            acc.insert(obj, &dominates);
        }
    }
    Ok(acc)
}

/// Spatial distance paired with temporal gap (`0.0` if the two temporal
/// expressions overlap or either side is timeless) to `reference`, the 2-D
/// point the BBS and angular flavors both project onto.
fn distance_pair(reference: &STObject, p: &STObject) -> (f64, f64) {
    let s_dist = reference.geom().distance(p.geom());
    let t_dist = match (reference.time(), p.time()) {
        (Some(a), Some(b)) => temporal_distance(a, b),
        _ => 0.0,
    };
    (s_dist, t_dist)
}

fn temporal_distance(a: &TemporalExpr, b: &TemporalExpr) -> f64 {
    if a.intersects(b) {
        return 0.0;
    }
    if a.precedes(b) {
        (b.start() - a.end().unwrap_or(b.start())) as f64
    } else if b.precedes(a) {
        (a.start() - b.end().unwrap_or(a.start())) as f64
    } else {
        0.0
    }
}

/// Pareto dominance over `(sDist, tDist)` pairs: lower is better on both axes.
fn distance_pair_dominates(a: &(f64, f64), b: &(f64, f64)) -> bool {
    a.0 <= b.0 && a.1 <= b.1 && (a.0 < b.0 || a.1 < b.1)
}

/// **BBS-style** flavor (`skyline`): project every element to its
/// `(sDist, tDist)` pair, grid-partition the 2-D distance space into
/// `grid_side * grid_side` cells, compute a local skyline per cell, prune
/// cells whose minimum corner is already dominated by a cell processed
/// earlier (ascending by distance from the origin), then merge survivors.
pub fn skyline_bbs<C: Collaborator<STObject>>(
    data: &C,
    reference: &STObject,
    grid_side: usize,
    token: &CancellationToken,
) -> StarkResult<Vec<STObject>> {
    let partitioner = data.partitioner();
    let mut projected: Vec<((f64, f64), STObject)> = Vec::new();
    for id in 0..partitioner.num_partitions() {
        if partitioner.is_empty(id) {
            continue;
        }
        for obj in data.iterator(id, token) {
            token.check(Some(id))?;
            projected.push((distance_pair(reference, &obj), obj));
        }
    }
    if projected.is_empty() {
        return Ok(Vec::new());
    }

    let max_s = projected.iter().map(|(d, _)| d.0).fold(0.0_f64, f64::max).max(1e-9);
    let max_t = projected.iter().map(|(d, _)| d.1).fold(0.0_f64, f64::max).max(1e-9);
    let grid_side = grid_side.max(1);
    let cell_s = max_s / grid_side as f64;
    let cell_t = max_t / grid_side as f64;

    let mut cells: HashMap<(usize, usize), Skyline<((f64, f64), STObject)>> = HashMap::new();
    for (d, obj) in projected {
        let cx = ((d.0 / cell_s) as usize).min(grid_side - 1);
        let cy = ((d.1 / cell_t) as usize).min(grid_side - 1);
        cells
            .entry((cx, cy))
            .or_default()
            .insert((d, obj), &|a, b| distance_pair_dominates(&a.0, &b.0));
    }

    let mut ordered: Vec<((usize, usize), Skyline<((f64, f64), STObject)>)> = cells.into_iter().collect();
    ordered.sort_by(|((ax, ay), _), ((bx, by), _)| (ax + ay).cmp(&(bx + by)));

    let mut global: Skyline<(f64, f64)> = Skyline::new();
    let mut survivors: Skyline<STObject> = Skyline::new();
    for ((cx, cy), local) in ordered {
        let min_corner = (cx as f64 * cell_s, cy as f64 * cell_t);
        if global.points().iter().any(|g| distance_pair_dominates(g, &min_corner)) {
            tracing::trace!(cx, cy, "bbs skyline pruned dominated cell");
            continue;
        }
        for (d, obj) in local.into_vec() {
            global.insert(d, &distance_pair_dominates);
            survivors.insert(obj, &|a: &STObject, b: &STObject| {
                distance_pair_dominates(&distance_pair(reference, a), &distance_pair(reference, b))
            });
        }
    }
    Ok(survivors.into_vec())
}

/// **Angular** flavor (`skylineAngular`): bucket points by the angle from
/// `reference` into `ppd` equal-width sectors (optionally restricted to the
/// first quadrant), compute a per-sector skyline, then merge every sector's
/// survivors into one global skyline.
pub fn skyline_angular<C: Collaborator<STObject>>(
    data: &C,
    reference: &STObject,
    ppd: usize,
    first_quadrant_only: bool,
    token: &CancellationToken,
) -> StarkResult<Vec<STObject>> {
    let ppd = ppd.max(1);
    let ref_centroid = reference.geom().centroid();
    let partitioner = data.partitioner();

    let sector_width = if first_quadrant_only {
        std::f64::consts::FRAC_PI_2 / ppd as f64
    } else {
        std::f64::consts::TAU / ppd as f64
    };

    let mut sectors: HashMap<usize, Skyline<STObject>> = HashMap::new();
    for id in 0..partitioner.num_partitions() {
        if partitioner.is_empty(id) {
            continue;
        }
        for obj in data.iterator(id, token) {
            token.check(Some(id))?;
            let c = obj.geom().centroid();
            let (dx, dy) = (c.x - ref_centroid.x, c.y - ref_centroid.y);
            if first_quadrant_only && (dx < 0.0 || dy < 0.0) {
                continue;
            }
            let angle = if first_quadrant_only {
                dy.atan2(dx)
            } else {
                dy.atan2(dx) + std::f64::consts::PI
            };
            let sector = ((angle / sector_width) as usize).min(ppd - 1);
            sectors.entry(sector).or_default().insert(obj, &|a: &STObject, b: &STObject| {
                distance_pair_dominates(&distance_pair(reference, a), &distance_pair(reference, b))
            });
        }
    }

    let mut global: Skyline<STObject> = Skyline::new();
    for (_, local) in sectors {
        global = global.merge(local, &|a: &STObject, b: &STObject| {
            distance_pair_dominates(&distance_pair(reference, a), &distance_pair(reference, b))
        });
    }
    Ok(global.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::CollaboratorRuntime;
    use crate::local::LocalRuntime;
    use stark_partition::{GridConfig, GridPartitioner, GridSizing, Universe};
    use stark_types::GeoType;

    fn pareto_2d_dominates(a: &(f64, f64), b: &(f64, f64)) -> bool {
        a.0 <= b.0 && a.1 <= b.1 && (a.0 < b.0 || a.1 < b.1)
    }

    #[test]
    fn skyline_keeps_only_non_dominated_points() {
        let mut sky = Skyline::new();
        for p in [(1.0, 5.0), (5.0, 1.0), (3.0, 3.0), (4.0, 4.0)] {
            sky.insert(p, &pareto_2d_dominates);
        }
        let mut points = sky.into_vec();
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(points, vec![(1.0, 5.0), (3.0, 3.0), (5.0, 1.0)]);
    }

    #[test]
    fn merge_is_commutative_up_to_dominance() {
        let mut a = Skyline::new();
        a.insert((1.0, 5.0), &pareto_2d_dominates);
        let mut b = Skyline::new();
        b.insert((5.0, 1.0), &pareto_2d_dominates);
        b.insert((2.0, 2.0), &pareto_2d_dominates);

        let merged_ab = a.clone().merge(b.clone(), &pareto_2d_dominates);
        let merged_ba = b.merge(a, &pareto_2d_dominates);

        let mut ab = merged_ab.into_vec();
        let mut ba = merged_ba.into_vec();
        ab.sort_by(|x, y| x.partial_cmp(y).unwrap());
        ba.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(ab, ba);
    }

    fn partitioner() -> GridPartitioner {
        let config = GridConfig {
            universe: Universe::new(0.0, 100.0, 0.0, 100.0),
            sizing: GridSizing::FixedSide { x_len: 10.0, y_len: 10.0 },
            points_only: true,
        };
        GridPartitioner::build(config, std::iter::empty::<&STObject>()).unwrap()
    }

    #[test]
    fn skyline_agg_no_point_is_dominated_by_another_member() {
        let runtime = LocalRuntime;
        let objs = vec![
            STObject::spatial(GeoType::point(1.0, 50.0)),
            STObject::spatial(GeoType::point(50.0, 1.0)),
            STObject::spatial(GeoType::point(40.0, 40.0)),
        ];
        let collab = runtime.parallelize(objs, partitioner());
        let token = CancellationToken::new();
        let reference = STObject::spatial(GeoType::point(0.0, 0.0));
        let sky = skyline_agg(
            &collab,
            |a, b| distance_pair_dominates(&distance_pair(&reference, a), &distance_pair(&reference, b)),
            &token,
        )
        .unwrap();
        assert_eq!(sky.points().len(), 3);
    }

    #[test]
    fn bbs_skyline_matches_aggregate_result() {
        let runtime = LocalRuntime;
        let objs = vec![
            STObject::spatial(GeoType::point(1.0, 1.0)),
            STObject::spatial(GeoType::point(2.0, 2.0)),
            STObject::spatial(GeoType::point(90.0, 90.0)),
        ];
        let collab = runtime.parallelize(objs, partitioner());
        let token = CancellationToken::new();
        let reference = STObject::spatial(GeoType::point(0.0, 0.0));
        let result = skyline_bbs(&collab, &reference, 4, &token).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0], STObject::spatial(GeoType::point(1.0, 1.0)));
    }
}
