//! Fatal interpretation errors.

use thiserror::Error;
use waymark_core::{OsmGeoKey, SourceError};

/// Errors that abort interpretation of one entity.
///
/// Recoverable conditions are reported as
/// [`InterpretIssue`](crate::InterpretIssue) values instead; an error means
/// the caller supplied malformed input or the source failed.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The entity passed in is a way with fewer than two node references.
    #[error("way {way} has {count} node reference(s); at least 2 are required")]
    MalformedWay {
        /// Key of the malformed way.
        way: OsmGeoKey,
        /// Number of node references it carries.
        count: usize,
    },
    /// The source failed for a reason other than a missing primitive.
    #[error("source failed while interpreting {entity}: {source}")]
    Source {
        /// Entity being interpreted.
        entity: OsmGeoKey,
        /// Source failure.
        #[source]
        source: SourceError,
    },
}

impl InterpretError {
    /// Key of the entity whose interpretation failed.
    #[must_use]
    pub const fn key(&self) -> OsmGeoKey {
        match self {
            Self::MalformedWay { way, .. } => *way,
            Self::Source { entity, .. } => *entity,
        }
    }
}
