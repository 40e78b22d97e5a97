//! Typed identifiers for OSM primitives.
//!
//! OSM ids are only unique within a primitive type, so lookups and
//! diagnostics carry the type alongside the raw id. Keys order by type first
//! (nodes, then ways, then relations) and by id second.
//!
//! # Examples
//! ```
//! use waymark_core::{OsmGeoKey, OsmGeoType};
//!
//! let key: OsmGeoKey = "w42".parse()?;
//! assert_eq!(key, OsmGeoKey::way(42));
//! assert_eq!(key.to_string(), "w42");
//! assert!(OsmGeoKey::node(900) < OsmGeoKey::new(OsmGeoType::Relation, 1));
//! # Ok::<(), waymark_core::OsmGeoKeyParseError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The three kinds of OSM primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OsmGeoType {
    /// A single coordinate.
    Node,
    /// An ordered list of node references.
    Way,
    /// An ordered list of typed, role-annotated members.
    Relation,
}

impl OsmGeoType {
    /// Return the type as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use waymark_core::OsmGeoType;
    ///
    /// assert_eq!(OsmGeoType::Relation.as_str(), "relation");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }

    const fn prefix(self) -> char {
        match self {
            Self::Node => 'n',
            Self::Way => 'w',
            Self::Relation => 'r',
        }
    }
}

impl fmt::Display for OsmGeoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive type paired with its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsmGeoKey {
    /// Primitive type. Declared first so the derived ordering compares it
    /// before the id.
    pub kind: OsmGeoType,
    /// Raw OSM id.
    pub id: i64,
}

impl OsmGeoKey {
    /// Construct a key from its parts.
    #[must_use]
    pub const fn new(kind: OsmGeoType, id: i64) -> Self {
        Self { kind, id }
    }

    /// Key for the node with `id`.
    #[must_use]
    pub const fn node(id: i64) -> Self {
        Self::new(OsmGeoType::Node, id)
    }

    /// Key for the way with `id`.
    #[must_use]
    pub const fn way(id: i64) -> Self {
        Self::new(OsmGeoType::Way, id)
    }

    /// Key for the relation with `id`.
    #[must_use]
    pub const fn relation(id: i64) -> Self {
        Self::new(OsmGeoType::Relation, id)
    }
}

impl fmt::Display for OsmGeoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.id)
    }
}

/// Errors returned when parsing an [`OsmGeoKey`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OsmGeoKeyParseError {
    /// The input did not start with `n`, `w` or `r`.
    #[error("unknown primitive prefix in '{input}'")]
    UnknownPrefix {
        /// Text that failed to parse.
        input: String,
    },
    /// The id part was not a valid integer.
    #[error("invalid primitive id in '{input}'")]
    InvalidId {
        /// Text that failed to parse.
        input: String,
    },
}

impl FromStr for OsmGeoKey {
    type Err = OsmGeoKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = match chars.next() {
            Some('n' | 'N') => OsmGeoType::Node,
            Some('w' | 'W') => OsmGeoType::Way,
            Some('r' | 'R') => OsmGeoType::Relation,
            _ => {
                return Err(OsmGeoKeyParseError::UnknownPrefix {
                    input: s.to_owned(),
                });
            }
        };
        let id = chars
            .as_str()
            .parse::<i64>()
            .map_err(|_| OsmGeoKeyParseError::InvalidId {
                input: s.to_owned(),
            })?;
        Ok(Self::new(kind, id))
    }
}
