//! Facade crate for the Waymark OSM geometry interpreter.
//!
//! This crate re-exports the data model from `waymark-core` and the
//! interpretation pipeline from `waymark-interpret`.

#![forbid(unsafe_code)]

pub use waymark_core::{
    Feature, Geometry, GeometryError, LinearRing, Member, MemorySnapshot, Node, OsmGeo, OsmGeoKey,
    OsmGeoKeyParseError, OsmGeoType, Polygon, PrimitiveSource, Relation, SourceError, Tags, Way,
    WayError,
};

pub use waymark_interpret::{
    AssembledRing, Assembly, AssemblyFailure, BatchOutcome, ClassifierRule, GeometryKind,
    InterpretError, InterpretIssue, Interpretation, Interpreter, InterpreterConfig, Nesting,
    NestingFailure, Role, TagClassifier, TagPredicate, Vertex, WayFragment, assemble_rings,
    interpret, nest_rings,
};

#[cfg(feature = "test-support")]
pub use waymark_core::test_support;
