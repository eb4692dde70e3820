// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial filter operator (`spec.md` §4.5): prune whole partitions by
//! extent before evaluating the exact predicate element by element.

use stark_partition::Partitioner;
use stark_types::{NRectRange, Predicate, STObject, StarkResult};

use crate::cancellation::CancellationToken;
use crate::collaborator::Collaborator;
use crate::geom;

/// Whether a partition whose accumulated extent is `extent` can possibly
/// hold a match for `predicate` against `query_envelope`. A `false` result
/// lets the caller skip reading that partition entirely.
fn partition_survives(predicate: &Predicate, extent: &NRectRange, query_envelope: &NRectRange) -> bool {
    match predicate {
        Predicate::Intersects | Predicate::Contains | Predicate::Covers => extent.intersects(query_envelope),
        Predicate::WithinDistance { max_dist } => extent.intersects(&geom::inflate(query_envelope, *max_dist)),
        Predicate::ContainedBy | Predicate::CoveredBy => {
            query_envelope.contains(extent) || extent.intersects(query_envelope)
        }
    }
}

/// Evaluate `predicate` between every element of `data` and `query`,
/// pruning partitions whose extent cannot possibly satisfy `predicate`
/// first. Honors `token` between element emissions.
pub fn filter<C: Collaborator<STObject>>(
    data: &C,
    query: &STObject,
    predicate: &Predicate,
    token: &CancellationToken,
) -> StarkResult<Vec<STObject>> {
    let query_envelope = geom::envelope(query.geom());
    let partitioner = data.partitioner();
    let mut matches = Vec::new();

    for id in 0..partitioner.num_partitions() {
        if partitioner.is_empty(id) {
            continue;
        }
        let extent = partitioner.partition_extent(id);
        if !partition_survives(predicate, extent, &query_envelope) {
            tracing::trace!(partition = id, "filter pruned partition by extent");
            continue;
        }
        for candidate in data.iterator(id, token) {
            token.check(Some(id))?;
            if candidate.evaluate(query, predicate) {
                matches.push(candidate);
            }
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalRuntime;
    use crate::collaborator::CollaboratorRuntime;
    use stark_partition::{GridConfig, GridPartitioner, GridSizing, Universe};
    use stark_types::GeoType;

    fn partitioner() -> GridPartitioner {
        let config = GridConfig {
            universe: Universe::new(0.0, 10.0, 0.0, 10.0),
            sizing: GridSizing::FixedSide { x_len: 5.0, y_len: 5.0 },
            points_only: true,
        };
        let objs = vec![
            STObject::spatial(GeoType::point(1.0, 1.0)),
            STObject::spatial(GeoType::point(8.0, 8.0)),
        ];
        GridPartitioner::build(config, &objs).unwrap()
    }

    #[test]
    fn intersects_filter_skips_far_partitions() {
        let runtime = LocalRuntime;
        let objs = vec![
            STObject::spatial(GeoType::point(1.0, 1.0)),
            STObject::spatial(GeoType::point(8.0, 8.0)),
        ];
        let collab = runtime.partition_by(&runtime.parallelize(objs, partitioner()), partitioner());
        let query = STObject::spatial(GeoType::point(1.5, 1.5));
        let token = CancellationToken::new();
        let hits = filter(&collab, &query, &Predicate::Intersects, &token).unwrap();
        assert!(hits.is_empty());

        let touching_query = STObject::spatial(GeoType::rect(0.0, 0.0, 2.0, 2.0));
        let hits = filter(&collab, &touching_query, &Predicate::Intersects, &token).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], STObject::spatial(GeoType::point(1.0, 1.0)));
    }

    #[test]
    fn cancellation_short_circuits_filter() {
        let runtime = LocalRuntime;
        let objs = vec![STObject::spatial(GeoType::point(1.0, 1.0))];
        let collab = runtime.partition_by(&runtime.parallelize(objs, partitioner()), partitioner());
        let token = CancellationToken::new();
        token.cancel();
        let query = STObject::spatial(GeoType::rect(0.0, 0.0, 10.0, 10.0));
        let err = filter(&collab, &query, &Predicate::Intersects, &token).unwrap_err();
        assert!(matches!(err, stark_types::StarkError::Interrupted { .. }));
    }
}
