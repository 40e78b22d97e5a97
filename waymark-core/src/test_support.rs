//! Fixture builders and sources used by unit and behaviour tests.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
    Member, MemorySnapshot, Node, OsmGeoKey, OsmGeoType, PrimitiveSource, Relation, SourceError,
    Tags, Way,
};

/// Build a way without validating its node count.
///
/// Tests use this to exercise both well-formed and deliberately malformed
/// ways.
#[must_use]
pub fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> Way {
    Way {
        id,
        nodes: nodes.to_vec(),
        tags: tags.iter().copied().collect(),
    }
}

/// Build a relation tagged `type=multipolygon` from `(way id, role)` pairs.
#[must_use]
pub fn multipolygon(id: i64, members: &[(i64, &str)]) -> Relation {
    Relation::new(
        id,
        Tags::from([("type", "multipolygon")]),
        members
            .iter()
            .map(|(way_id, role)| Member::way(*way_id, *role))
            .collect(),
    )
}

/// Snapshot containing `(id, latitude, longitude)` nodes.
#[must_use]
pub fn snapshot_with_nodes(nodes: &[(i64, f64, f64)]) -> MemorySnapshot {
    nodes
        .iter()
        .map(|(id, lat, lon)| Node::new(*id, *lat, *lon))
        .collect()
}

/// The node layout shared by the multipolygon fixtures.
///
/// Nodes 1-4 form the unit square, 5-8 a small square inside it near the
/// origin corner and 9-12 a second small square beside the first.
#[must_use]
pub fn square_with_hole_nodes() -> MemorySnapshot {
    snapshot_with_nodes(&[
        (1, 0.0, 0.0),
        (2, 0.0, 1.0),
        (3, 1.0, 1.0),
        (4, 1.0, 0.0),
        (5, 0.25, 0.25),
        (6, 0.25, 0.40),
        (7, 0.40, 0.40),
        (8, 0.40, 0.25),
        (9, 0.60, 0.25),
        (10, 0.60, 0.40),
        (11, 0.75, 0.40),
        (12, 0.75, 0.25),
    ])
}

/// Source wrapper whose lookups fail with a backend error for chosen keys.
#[derive(Debug, Default)]
pub struct FailingSource<S> {
    inner: S,
    failing: BTreeSet<OsmGeoKey>,
}

/// Error reported by [`FailingSource`].
#[derive(Debug, Clone, Copy, Error)]
#[error("simulated storage outage")]
pub struct SimulatedOutage;

impl<S> FailingSource<S> {
    /// Wrap `inner`, failing lookups of every key in `failing`.
    #[must_use]
    pub fn new<I>(inner: S, failing: I) -> Self
    where
        I: IntoIterator<Item = OsmGeoKey>,
    {
        Self {
            inner,
            failing: failing.into_iter().collect(),
        }
    }

    fn check(&self, kind: OsmGeoType, id: i64) -> Result<(), SourceError> {
        let key = OsmGeoKey::new(kind, id);
        if self.failing.contains(&key) {
            return Err(SourceError::Backend {
                key,
                source: Box::new(SimulatedOutage),
            });
        }
        Ok(())
    }
}

impl<S: PrimitiveSource> PrimitiveSource for FailingSource<S> {
    fn get_node(&self, id: i64) -> Result<Node, SourceError> {
        self.check(OsmGeoType::Node, id)?;
        self.inner.get_node(id)
    }

    fn get_way(&self, id: i64) -> Result<Way, SourceError> {
        self.check(OsmGeoType::Way, id)?;
        self.inner.get_way(id)
    }

    fn get_relation(&self, id: i64) -> Result<Relation, SourceError> {
        self.check(OsmGeoType::Relation, id)?;
        self.inner.get_relation(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_source_only_fails_listed_keys() {
        let source = FailingSource::new(square_with_hole_nodes(), [OsmGeoKey::node(2)]);
        assert!(source.get_node(1).is_ok());
        let err = source.get_node(2).unwrap_err();
        assert!(!err.is_not_found());
        assert!(source.get_node(99).unwrap_err().is_not_found());
    }

    #[test]
    fn outage_is_reported_as_the_backend_cause() {
        let source = FailingSource::new(MemorySnapshot::new(), [OsmGeoKey::way(3)]);
        let err = source.get_way(3).unwrap_err();
        let cause = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("simulated storage outage"));
    }
}
