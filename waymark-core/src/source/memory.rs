//! In-memory snapshot source.

use std::collections::BTreeMap;

use log::debug;

use super::{PrimitiveSource, SourceError};
use crate::{Node, OsmGeo, OsmGeoKey, OsmGeoType, Relation, Way};

/// A `PrimitiveSource` holding a fixed set of primitives in memory.
///
/// Inserting a primitive whose key is already present replaces the earlier
/// value. Lookups clone the stored primitive.
///
/// # Examples
/// ```
/// use waymark_core::{MemorySnapshot, Node, OsmGeoKey, PrimitiveSource, Tags, Way};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut snapshot = MemorySnapshot::new();
/// snapshot.add_or_update(Node::new(1, 0.0, 0.0));
/// snapshot.add_or_update(Node::new(2, 1.0, 0.0));
/// snapshot.add_or_update(Way::new(10, vec![1, 2], Tags::new())?);
///
/// assert_eq!(snapshot.len(), 3);
/// assert_eq!(snapshot.get_way(10)?.nodes, vec![1, 2]);
/// assert!(snapshot.get(OsmGeoKey::relation(1)).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    nodes: BTreeMap<i64, Node>,
    ways: BTreeMap<i64, Way>,
    relations: BTreeMap<i64, Relation>,
}

impl MemorySnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a primitive.
    pub fn add_or_update(&mut self, primitive: impl Into<OsmGeo>) {
        let primitive = primitive.into();
        let key = primitive.key();
        let replaced = match primitive {
            OsmGeo::Node(node) => self.nodes.insert(node.id, node).is_some(),
            OsmGeo::Way(way) => self.ways.insert(way.id, way).is_some(),
            OsmGeo::Relation(relation) => self.relations.insert(relation.id, relation).is_some(),
        };
        if replaced {
            debug!("Replaced {key} in memory snapshot");
        }
    }

    /// Whether a primitive is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: OsmGeoKey) -> bool {
        match key.kind {
            OsmGeoType::Node => self.nodes.contains_key(&key.id),
            OsmGeoType::Way => self.ways.contains_key(&key.id),
            OsmGeoType::Relation => self.relations.contains_key(&key.id),
        }
    }

    /// Total number of stored primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() + self.ways.len() + self.relations.len()
    }

    /// Whether the snapshot holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys in [`OsmGeoKey`] order.
    pub fn keys(&self) -> impl Iterator<Item = OsmGeoKey> + '_ {
        self.nodes
            .keys()
            .map(|id| OsmGeoKey::node(*id))
            .chain(self.ways.keys().map(|id| OsmGeoKey::way(*id)))
            .chain(self.relations.keys().map(|id| OsmGeoKey::relation(*id)))
    }
}

impl<P: Into<OsmGeo>> FromIterator<P> for MemorySnapshot {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        snapshot.extend(iter);
        snapshot
    }
}

impl<P: Into<OsmGeo>> Extend<P> for MemorySnapshot {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for primitive in iter {
            self.add_or_update(primitive);
        }
    }
}

impl PrimitiveSource for MemorySnapshot {
    fn get_node(&self, id: i64) -> Result<Node, SourceError> {
        self.nodes
            .get(&id)
            .cloned()
            .ok_or(SourceError::NotFound {
                key: OsmGeoKey::node(id),
            })
    }

    fn get_way(&self, id: i64) -> Result<Way, SourceError> {
        self.ways.get(&id).cloned().ok_or(SourceError::NotFound {
            key: OsmGeoKey::way(id),
        })
    }

    fn get_relation(&self, id: i64) -> Result<Relation, SourceError> {
        self.relations
            .get(&id)
            .cloned()
            .ok_or(SourceError::NotFound {
                key: OsmGeoKey::relation(id),
            })
    }
}
