//! Core data model for the Waymark OSM geometry interpreter.
//!
//! Responsibilities:
//! - Define the OSM primitives (nodes, ways, relations) and their typed keys.
//! - Define the output geometries and features, enforcing geometric
//!   invariants at construction.
//! - Define the `PrimitiveSource` capability and an in-memory snapshot
//!   implementation.
//!
//! Boundaries:
//! - No wire formats (XML, PBF) and no persistence beyond memory.
//! - No interpretation rules (live in `waymark-interpret`).
//!
//! Invariants:
//! - Coordinates are WGS84 with `x = longitude`, `y = latitude`.
//! - Values are immutable snapshots; nothing here holds global state.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod feature;
mod geometry;
mod key;
mod primitive;
pub mod source;
mod tags;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use feature::Feature;
pub use geometry::{
    Geometry, GeometryError, LinearRing, MIN_LINE_COORDS, MIN_RING_COORDS, Polygon,
};
pub use key::{OsmGeoKey, OsmGeoKeyParseError, OsmGeoType};
pub use primitive::{Member, Node, OsmGeo, Relation, Way, WayError};
pub use source::{MemorySnapshot, PrimitiveSource, SourceError};
pub use tags::Tags;
