//! Geometry interpretation for OSM primitives.
//!
//! Responsibilities:
//! - Classify tag sets into geometry kinds through an ordered rule table.
//! - Assemble closed rings from way fragments that share endpoint nodes.
//! - Nest inner rings into the outer rings that contain them.
//! - Turn nodes, ways and multipolygon relations into features, reporting
//!   skipped input as issues.
//!
//! Boundaries:
//! - Primitives are read through [`waymark_core::PrimitiveSource`]; this
//!   crate never stores them.
//! - Only `type=multipolygon` relations are interpreted.
//!
//! Invariants:
//! - Interpretation is a pure function of the entity and the source: the
//!   same inputs yield the same features whatever order fragments arrive in.
//! - Recoverable problems never abort a call; they are returned as
//!   [`InterpretIssue`] values and logged at `warn` level.

#![forbid(unsafe_code)]

mod assemble;
mod classify;
mod config;
mod error;
mod interpreter;
mod issue;
mod nest;

pub use assemble::{AssembledRing, Assembly, AssemblyFailure, Vertex, WayFragment, assemble_rings};
pub use classify::{ClassifierRule, GeometryKind, TagClassifier, TagPredicate};
pub use config::InterpreterConfig;
pub use error::InterpretError;
pub use interpreter::{BatchOutcome, Interpretation, Interpreter, interpret};
pub use issue::InterpretIssue;
pub use nest::{Nesting, NestingFailure, Role, nest_rings};
