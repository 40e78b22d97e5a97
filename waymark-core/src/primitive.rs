//! OSM primitives: nodes, ways and relations.
//!
//! These are read-only snapshots of the data supplied by a
//! [`PrimitiveSource`](crate::PrimitiveSource). Fields are public for easy
//! construction in tests and adapters; the validating constructors should be
//! preferred when input comes from untrusted data.

use geo::Coord;
use thiserror::Error;

use crate::{OsmGeoKey, OsmGeoType, Tags};

/// A single geographic position.
///
/// # Examples
/// ```
/// use waymark_core::Node;
///
/// let node = Node::new(1, 52.5, 13.4);
/// assert_eq!(node.coord().x, 13.4);
/// assert_eq!(node.coord().y, 52.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// OSM node id.
    pub id: i64,
    /// Latitude in WGS84 degrees.
    pub latitude: f64,
    /// Longitude in WGS84 degrees.
    pub longitude: f64,
    /// Tags attached to the node.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
}

impl Node {
    /// Construct an untagged node.
    #[must_use]
    pub fn new(id: i64, latitude: f64, longitude: f64) -> Self {
        Self::with_tags(id, latitude, longitude, Tags::new())
    }

    /// Construct a node carrying `tags`.
    #[must_use]
    pub const fn with_tags(id: i64, latitude: f64, longitude: f64, tags: Tags) -> Self {
        Self {
            id,
            latitude,
            longitude,
            tags,
        }
    }

    /// Position as a `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Typed key for this node.
    #[must_use]
    pub const fn key(&self) -> OsmGeoKey {
        OsmGeoKey::node(self.id)
    }
}

/// Errors returned by [`Way::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WayError {
    /// Fewer than two node references were supplied.
    #[error("way {id} has {count} node references; at least 2 are required")]
    TooFewNodes {
        /// Id of the rejected way.
        id: i64,
        /// Number of node references supplied.
        count: usize,
    },
}

/// An ordered sequence of node references.
///
/// # Examples
/// ```
/// use waymark_core::{Tags, Way};
///
/// # fn main() -> Result<(), waymark_core::WayError> {
/// let way = Way::new(7, vec![1, 2, 3, 1], Tags::from([("area", "yes")]))?;
/// assert!(way.is_closed());
/// assert!(Way::new(8, vec![1], Tags::new()).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    /// OSM way id.
    pub id: i64,
    /// Referenced node ids in traversal order.
    pub nodes: Vec<i64>,
    /// Tags attached to the way.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
}

impl Way {
    /// Validate and construct a way.
    ///
    /// # Errors
    /// Returns [`WayError`] when `nodes` holds fewer than two references.
    pub fn new(id: i64, nodes: Vec<i64>, tags: Tags) -> Result<Self, WayError> {
        if nodes.len() < 2 {
            return Err(WayError::TooFewNodes {
                id,
                count: nodes.len(),
            });
        }
        Ok(Self { id, nodes, tags })
    }

    /// Whether the first and last node references are the same node.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => self.nodes.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Typed key for this way.
    #[must_use]
    pub const fn key(&self) -> OsmGeoKey {
        OsmGeoKey::way(self.id)
    }
}

/// A typed, role-annotated reference held by a [`Relation`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    /// Type of the referenced primitive.
    pub kind: OsmGeoType,
    /// Id of the referenced primitive.
    pub id: i64,
    /// Declared role, e.g. `outer` or `inner`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: String,
}

impl Member {
    /// Construct a member reference.
    #[must_use]
    pub fn new(kind: OsmGeoType, id: i64, role: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            role: role.into(),
        }
    }

    /// Member referencing the way with `id`.
    #[must_use]
    pub fn way(id: i64, role: impl Into<String>) -> Self {
        Self::new(OsmGeoType::Way, id, role)
    }

    /// Typed key of the referenced primitive.
    #[must_use]
    pub const fn key(&self) -> OsmGeoKey {
        OsmGeoKey::new(self.kind, self.id)
    }
}

/// A tagged, ordered group of members.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relation {
    /// OSM relation id.
    pub id: i64,
    /// Tags attached to the relation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
    /// Members in declaration order.
    pub members: Vec<Member>,
}

impl Relation {
    /// Construct a relation.
    #[must_use]
    pub const fn new(id: i64, tags: Tags, members: Vec<Member>) -> Self {
        Self { id, tags, members }
    }

    /// Typed key for this relation.
    #[must_use]
    pub const fn key(&self) -> OsmGeoKey {
        OsmGeoKey::relation(self.id)
    }
}

/// Any OSM primitive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum OsmGeo {
    /// A node.
    Node(Node),
    /// A way.
    Way(Way),
    /// A relation.
    Relation(Relation),
}

impl OsmGeo {
    /// Typed key of the wrapped primitive.
    #[must_use]
    pub const fn key(&self) -> OsmGeoKey {
        match self {
            Self::Node(node) => node.key(),
            Self::Way(way) => way.key(),
            Self::Relation(relation) => relation.key(),
        }
    }

    /// Tags of the wrapped primitive.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        match self {
            Self::Node(node) => &node.tags,
            Self::Way(way) => &way.tags,
            Self::Relation(relation) => &relation.tags,
        }
    }

    /// Primitive type of the wrapped value.
    #[must_use]
    pub const fn kind(&self) -> OsmGeoType {
        self.key().kind
    }
}

impl From<Node> for OsmGeo {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Way> for OsmGeo {
    fn from(way: Way) -> Self {
        Self::Way(way)
    }
}

impl From<Relation> for OsmGeo {
    fn from(relation: Relation) -> Self {
        Self::Relation(relation)
    }
}
