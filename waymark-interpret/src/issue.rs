//! Non-fatal interpretation diagnostics.
//!
//! An issue records input the interpreter skipped while still producing a
//! best-effort result. Issues are returned on the
//! [`Interpretation`](crate::Interpretation) and logged at `warn` level.

use log::warn;
use thiserror::Error;
use waymark_core::OsmGeoKey;

use crate::nest::Role;

/// Something the interpreter skipped or could not complete for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretIssue {
    /// A batch key the source does not hold.
    #[error("{entity} is missing from the source")]
    MissingEntity {
        /// Requested key.
        entity: OsmGeoKey,
    },
    /// A relation member way the source does not hold.
    #[error("{relation} references missing member {member}")]
    MissingMember {
        /// Relation being interpreted.
        relation: OsmGeoKey,
        /// Key of the missing member.
        member: OsmGeoKey,
    },
    /// A way node the source does not hold. Lines leave the node out; rings
    /// skip the whole way (see [`InterpretIssue::IncompleteWay`]).
    #[error("{entity} references missing node n{node}")]
    MissingNode {
        /// Way or relation being interpreted.
        entity: OsmGeoKey,
        /// Missing node id.
        node: i64,
    },
    /// A way that could not be used as a ring because some of its nodes are
    /// missing.
    #[error("{entity} skips {way}, which references missing nodes")]
    IncompleteWay {
        /// Way or relation being interpreted.
        entity: OsmGeoKey,
        /// The skipped way.
        way: OsmGeoKey,
    },
    /// A relation member that is not a way or whose role is neither `outer`
    /// nor `inner`.
    #[error("{relation} member {member} with role {role:?} is not an outer or inner way")]
    UnsupportedMember {
        /// Relation being interpreted.
        relation: OsmGeoKey,
        /// Key of the skipped member.
        member: OsmGeoKey,
        /// Declared role.
        role: String,
    },
    /// The same way listed more than once under one role.
    #[error("{relation} lists {member} as {role} more than once")]
    DuplicateMember {
        /// Relation being interpreted.
        relation: OsmGeoKey,
        /// Repeated member.
        member: OsmGeoKey,
        /// Role the repeat was listed under.
        role: Role,
    },
    /// A relation member way with fewer than two node references.
    #[error("{relation} member {member} has fewer than two nodes")]
    DegenerateWay {
        /// Relation being interpreted.
        relation: OsmGeoKey,
        /// Malformed member way.
        member: OsmGeoKey,
    },
    /// A way classified as an area whose node list does not close.
    #[error("{way} is tagged as an area but is not closed")]
    UnclosedArea {
        /// Offending way.
        way: OsmGeoKey,
    },
    /// A relation that is not an area-classified multipolygon.
    #[error("{relation} is not an area multipolygon")]
    UnsupportedRelation {
        /// Skipped relation.
        relation: OsmGeoKey,
    },
    /// Member ways that could not be joined into a closed ring.
    #[error("{relation} has an unclosed {role} ring through ways {ways:?}")]
    UnclosedRing {
        /// Relation being interpreted.
        relation: OsmGeoKey,
        /// Role group of the chain.
        role: Role,
        /// Ways in the chain.
        ways: Vec<i64>,
    },
    /// A closed chain with fewer than four coordinates.
    #[error("{entity} has a ring of {coords} coordinate(s) through ways {ways:?}; at least 4 are required")]
    DegenerateRing {
        /// Way or relation being interpreted.
        entity: OsmGeoKey,
        /// Ways in the chain.
        ways: Vec<i64>,
        /// Coordinates the chain resolved to.
        coords: usize,
    },
    /// An inner ring enclosed by no outer ring.
    #[error("{relation} has an inner ring through ways {ways:?} outside every outer ring")]
    OrphanInner {
        /// Relation being interpreted.
        relation: OsmGeoKey,
        /// Ways forming the inner ring.
        ways: Vec<i64>,
    },
    /// An inner ring inside another hole of the same polygon.
    #[error("{relation} has an inner ring through ways {ways:?} nested in the inner ring through {within:?}")]
    NestedInner {
        /// Relation being interpreted.
        relation: OsmGeoKey,
        /// Ways forming the dropped ring.
        ways: Vec<i64>,
        /// Ways forming the enclosing inner ring.
        within: Vec<i64>,
    },
    /// An inner ring partly overlapping another hole of the same polygon.
    #[error("{relation} has an inner ring through ways {ways:?} overlapping the inner ring through {overlaps:?}")]
    OverlappingInner {
        /// Relation being interpreted.
        relation: OsmGeoKey,
        /// Ways forming the dropped ring.
        ways: Vec<i64>,
        /// Ways forming the hole it overlaps.
        overlaps: Vec<i64>,
    },
    /// A line whose resolved coordinates number fewer than two.
    #[error("{way} resolved to {coords} coordinate(s); a line needs at least 2")]
    EmptyLine {
        /// Offending way.
        way: OsmGeoKey,
        /// Coordinates resolved.
        coords: usize,
    },
}

impl InterpretIssue {
    /// Key of the entity being interpreted when the issue arose.
    #[must_use]
    pub const fn entity(&self) -> OsmGeoKey {
        match self {
            Self::MissingEntity { entity }
            | Self::MissingNode { entity, .. }
            | Self::IncompleteWay { entity, .. }
            | Self::DegenerateRing { entity, .. } => *entity,
            Self::MissingMember { relation, .. }
            | Self::UnsupportedMember { relation, .. }
            | Self::DuplicateMember { relation, .. }
            | Self::DegenerateWay { relation, .. }
            | Self::UnsupportedRelation { relation }
            | Self::UnclosedRing { relation, .. }
            | Self::OrphanInner { relation, .. }
            | Self::NestedInner { relation, .. }
            | Self::OverlappingInner { relation, .. } => *relation,
            Self::UnclosedArea { way } | Self::EmptyLine { way, .. } => *way,
        }
    }
}

/// Collects issues for one interpretation, logging each as it arrives.
#[derive(Debug, Default)]
pub(crate) struct IssueLog {
    issues: Vec<InterpretIssue>,
}

impl IssueLog {
    pub(crate) fn report(&mut self, issue: InterpretIssue) {
        warn!("Skipped input: {issue}");
        self.issues.push(issue);
    }

    pub(crate) fn into_issues(self) -> Vec<InterpretIssue> {
        self.issues
    }
}
