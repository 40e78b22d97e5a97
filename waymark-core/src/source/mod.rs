//! Read access to OSM primitives.
//!
//! The `PrimitiveSource` trait is the only capability the interpreter needs
//! from its environment: exact-id lookups of nodes, ways and relations.
//! Absence is a recoverable [`SourceError::NotFound`]; any other failure of
//! the backing store is reported as [`SourceError::Backend`].

use std::error::Error as StdError;

use thiserror::Error;

use crate::{Node, OsmGeo, OsmGeoKey, OsmGeoType, Relation, Way};

mod memory;

pub use memory::MemorySnapshot;

/// Errors returned by [`PrimitiveSource`] lookups.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No primitive exists for the requested key.
    #[error("{key} was not found in the source")]
    NotFound {
        /// Requested key.
        key: OsmGeoKey,
    },
    /// The backing store failed while serving the lookup.
    #[error("source backend failed while reading {key}")]
    Backend {
        /// Requested key.
        key: OsmGeoKey,
        /// Underlying failure.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl SourceError {
    /// Whether the error only signals an absent primitive.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Key of the lookup that failed.
    #[must_use]
    pub const fn key(&self) -> OsmGeoKey {
        match self {
            Self::NotFound { key } | Self::Backend { key, .. } => *key,
        }
    }
}

/// Exact-id lookups of OSM primitives.
///
/// Implementations must be read-only from the caller's point of view. The
/// interpreter never mutates what it is given and calls the source from a
/// single thread per interpretation, so concurrent use is only required when
/// callers interpret several entities in parallel.
///
/// # Examples
///
/// ```rust
/// use waymark_core::{
///     Node, OsmGeoKey, PrimitiveSource, Relation, SourceError, Tags, Way,
/// };
///
/// struct SingleNode(Node);
///
/// impl PrimitiveSource for SingleNode {
///     fn get_node(&self, id: i64) -> Result<Node, SourceError> {
///         if id == self.0.id {
///             Ok(self.0.clone())
///         } else {
///             Err(SourceError::NotFound { key: OsmGeoKey::node(id) })
///         }
///     }
///
///     fn get_way(&self, id: i64) -> Result<Way, SourceError> {
///         Err(SourceError::NotFound { key: OsmGeoKey::way(id) })
///     }
///
///     fn get_relation(&self, id: i64) -> Result<Relation, SourceError> {
///         Err(SourceError::NotFound { key: OsmGeoKey::relation(id) })
///     }
/// }
///
/// let source = SingleNode(Node::new(1, 0.0, 0.0));
/// assert!(source.get(OsmGeoKey::node(1)).is_ok());
/// assert!(source.get(OsmGeoKey::way(1)).unwrap_err().is_not_found());
/// ```
pub trait PrimitiveSource {
    /// Return the node with `id`.
    ///
    /// # Errors
    /// [`SourceError::NotFound`] when the source holds no such node;
    /// [`SourceError::Backend`] when the lookup itself fails.
    fn get_node(&self, id: i64) -> Result<Node, SourceError>;

    /// Return the way with `id`.
    ///
    /// # Errors
    /// [`SourceError::NotFound`] when the source holds no such way;
    /// [`SourceError::Backend`] when the lookup itself fails.
    fn get_way(&self, id: i64) -> Result<Way, SourceError>;

    /// Return the relation with `id`.
    ///
    /// # Errors
    /// [`SourceError::NotFound`] when the source holds no such relation;
    /// [`SourceError::Backend`] when the lookup itself fails.
    fn get_relation(&self, id: i64) -> Result<Relation, SourceError>;

    /// Return whichever primitive `key` names.
    ///
    /// # Errors
    /// As the typed lookup for `key.kind`.
    fn get(&self, key: OsmGeoKey) -> Result<OsmGeo, SourceError> {
        match key.kind {
            OsmGeoType::Node => self.get_node(key.id).map(OsmGeo::Node),
            OsmGeoType::Way => self.get_way(key.id).map(OsmGeo::Way),
            OsmGeoType::Relation => self.get_relation(key.id).map(OsmGeo::Relation),
        }
    }
}

impl<S: PrimitiveSource + ?Sized> PrimitiveSource for &S {
    fn get_node(&self, id: i64) -> Result<Node, SourceError> {
        (**self).get_node(id)
    }

    fn get_way(&self, id: i64) -> Result<Way, SourceError> {
        (**self).get_way(id)
    }

    fn get_relation(&self, id: i64) -> Result<Relation, SourceError> {
        (**self).get_relation(id)
    }
}
