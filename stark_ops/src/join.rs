// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial join operator (`spec.md` §4.6): prune partition pairs by extent,
//! then evaluate the exact predicate over the surviving pairs' elements.

use std::collections::HashSet;

use stark_partition::Partitioner;
use stark_types::{Predicate, STObject, StarkResult};

use crate::cancellation::CancellationToken;
use crate::collaborator::Collaborator;

/// Whether partitions `l` and `r` can possibly contain a matching pair,
/// i.e. their extents overlap under right-open semantics.
fn pair_survives(left: &impl Partitioner, right: &impl Partitioner, l: u32, r: u32) -> bool {
    left.partition_extent(l).intersects(right.partition_extent(r))
}

/// Evaluate `pred` over every `(left, right)` pair surviving partition-extent
/// pruning, emitting `(leftValue, rightValue)` for every match.
///
/// `one_to_many` groups the right-side partitions visited per left
/// partition (avoiding redundant right-side reads when several left
/// partitions share right neighbors); it does not change the result set,
/// only the per-pair read pattern (`spec.md` §4.6).
pub fn join<L: Collaborator<STObject>, R: Collaborator<STObject>>(
    left: &L,
    right: &R,
    pred: impl Fn(&STObject, &STObject) -> bool,
    one_to_many: bool,
    token: &CancellationToken,
) -> StarkResult<Vec<(STObject, STObject)>> {
    let lp = left.partitioner();
    let rp = right.partitioner();
    let mut out = Vec::new();

    for l in 0..lp.num_partitions() {
        if lp.is_empty(l) {
            continue;
        }
        let surviving_rights: Vec<u32> = (0..rp.num_partitions())
            .filter(|&r| !rp.is_empty(r) && pair_survives(lp, rp, l, r))
            .collect();
        if surviving_rights.is_empty() {
            tracing::trace!(partition = l, "join found no surviving right partitions");
            continue;
        }

        if one_to_many {
            let right_rows: Vec<STObject> = surviving_rights
                .iter()
                .flat_map(|&r| right.iterator(r, token))
                .collect();
            for lv in left.iterator(l, token) {
                token.check(Some(l))?;
                for rv in &right_rows {
                    if pred(&lv, rv) {
                        out.push((lv.clone(), rv.clone()));
                    }
                }
            }
        } else {
            for &r in &surviving_rights {
                let right_rows: Vec<STObject> = right.iterator(r, token).collect();
                for lv in left.iterator(l, token) {
                    token.check(Some(l))?;
                    for rv in &right_rows {
                        if pred(&lv, rv) {
                            out.push((lv.clone(), rv.clone()));
                        }
                    }
                }
            }
        }
    }
    Ok(out)
}

/// [`join`] specialized to a [`Predicate`] rather than an arbitrary closure.
pub fn join_predicate<L: Collaborator<STObject>, R: Collaborator<STObject>>(
    left: &L,
    right: &R,
    predicate: Predicate,
    one_to_many: bool,
    token: &CancellationToken,
) -> StarkResult<Vec<(STObject, STObject)>> {
    join(left, right, move |a, b| a.evaluate(b, &predicate), one_to_many, token)
}

/// Every distinct right-partition id touched while computing an `oneToMany`
/// join, exposed for callers that want to pre-warm a shared right-side
/// index before the join runs.
pub fn one_to_many_right_partitions<L: Collaborator<STObject>, R: Collaborator<STObject>>(left: &L, right: &R) -> Vec<u32> {
    let lp = left.partitioner();
    let rp = right.partitioner();
    let mut seen = HashSet::new();
    for l in 0..lp.num_partitions() {
        if lp.is_empty(l) {
            continue;
        }
        for r in 0..rp.num_partitions() {
            if !rp.is_empty(r) && pair_survives(lp, rp, l, r) {
                seen.insert(r);
            }
        }
    }
    let mut out: Vec<u32> = seen.into_iter().collect();
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::CollaboratorRuntime;
    use crate::local::LocalRuntime;
    use stark_partition::{GridConfig, GridPartitioner, GridSizing, Universe};
    use stark_types::GeoType;

    fn partitioner() -> GridPartitioner {
        let config = GridConfig {
            universe: Universe::new(-80.0, 30.0, 30.0, 50.0),
            sizing: GridSizing::FixedSide { x_len: 10.0, y_len: 10.0 },
            points_only: true,
        };
        let objs = vec![
            STObject::spatial(GeoType::polygon([(-73.0, 40.5), (-70.0, 40.5), (-72.0, 41.0)])),
            STObject::spatial(GeoType::point(25.0, 20.0 + 20.0)),
        ];
        GridPartitioner::build(config, &objs).unwrap()
    }

    #[test]
    fn intersects_join_has_no_cross_matches() {
        let runtime = LocalRuntime;
        let objs = vec![
            STObject::spatial(GeoType::polygon([(-73.0, 40.5), (-70.0, 40.5), (-72.0, 41.0)])),
            STObject::spatial(GeoType::point(25.0, 40.0)),
        ];
        let left = runtime.partition_by(&runtime.parallelize(objs.clone(), partitioner()), partitioner());
        let right = runtime.partition_by(&runtime.parallelize(objs, partitioner()), partitioner());
        let token = CancellationToken::new();
        let result = join_predicate(&left, &right, Predicate::Intersects, false, &token).unwrap();
        assert_eq!(result.len(), 2);
        for (l, r) in &result {
            assert_eq!(l, r);
        }
    }
}
