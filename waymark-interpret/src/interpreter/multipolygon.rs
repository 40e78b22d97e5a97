//! Multipolygon relations: member resolution, ring assembly per role and
//! nesting.

use std::collections::BTreeSet;

use log::debug;
use waymark_core::{Feature, Geometry, OsmGeoType, PrimitiveSource, Relation};

use super::resolve::Resolver;
use crate::assemble::{Assembly, AssemblyFailure, WayFragment, assemble_rings};
use crate::classify::{GeometryKind, TagClassifier};
use crate::error::InterpretError;
use crate::issue::{InterpretIssue, IssueLog};
use crate::nest::{NestingFailure, Role, nest_rings};

/// Outer and inner fragments gathered from the members of one relation.
#[derive(Debug, Default)]
struct Members {
    outer: Vec<WayFragment>,
    inner: Vec<WayFragment>,
}

impl Members {
    fn push(&mut self, role: Role, fragment: WayFragment) {
        match role {
            Role::Outer => self.outer.push(fragment),
            Role::Inner => self.inner.push(fragment),
        }
    }
}

pub(super) fn interpret<S: PrimitiveSource + ?Sized>(
    classifier: &TagClassifier,
    relation: &Relation,
    resolver: &mut Resolver<'_, S>,
    log: &mut IssueLog,
) -> Result<Vec<Feature>, InterpretError> {
    let key = relation.key();
    let kind = classifier.classify(OsmGeoType::Relation, &relation.tags);
    if kind != GeometryKind::Area || !relation.tags.contains_key_value("type", "multipolygon") {
        log.report(InterpretIssue::UnsupportedRelation { relation: key });
        return Ok(Vec::new());
    }

    let members = collect_members(relation, resolver, log)?;
    debug!(
        "Collected {} outer and {} inner fragment(s) for {key}",
        members.outer.len(),
        members.inner.len()
    );

    let outer = assemble_rings(&members.outer);
    let inner = assemble_rings(&members.inner);
    report_assembly(relation, Role::Outer, &outer, log);
    report_assembly(relation, Role::Inner, &inner, log);

    let nesting = nest_rings(&outer.rings, &inner.rings);
    for failure in nesting.failures {
        log.report(match failure {
            NestingFailure::OrphanInner { ways } => InterpretIssue::OrphanInner { relation: key, ways },
            NestingFailure::NestedInner { ways, within } => InterpretIssue::NestedInner {
                relation: key,
                ways,
                within,
            },
            NestingFailure::OverlappingInner { ways, overlaps } => {
                InterpretIssue::OverlappingInner {
                    relation: key,
                    ways,
                    overlaps,
                }
            }
        });
    }

    Ok(nesting
        .polygons
        .into_iter()
        .map(|polygon| Feature::new(key, Geometry::from(polygon), relation.tags.clone()))
        .collect())
}

fn collect_members<S: PrimitiveSource + ?Sized>(
    relation: &Relation,
    resolver: &mut Resolver<'_, S>,
    log: &mut IssueLog,
) -> Result<Members, InterpretError> {
    let key = relation.key();
    let mut members = Members::default();
    let mut seen = BTreeSet::new();
    for member in &relation.members {
        let role = Role::parse(&member.role).filter(|_| member.kind == OsmGeoType::Way);
        let Some(role) = role else {
            log.report(InterpretIssue::UnsupportedMember {
                relation: key,
                member: member.key(),
                role: member.role.clone(),
            });
            continue;
        };
        if !seen.insert((member.id, role)) {
            log.report(InterpretIssue::DuplicateMember {
                relation: key,
                member: member.key(),
                role,
            });
            continue;
        }
        let Some(way) = resolver.member_way(key, member.id, log)? else {
            continue;
        };
        if way.nodes.len() < 2 {
            log.report(InterpretIssue::DegenerateWay {
                relation: key,
                member: way.key(),
            });
            continue;
        }
        let Some(vertices) = resolver.complete_vertices(key, &way.nodes, log)? else {
            log.report(InterpretIssue::IncompleteWay {
                entity: key,
                way: way.key(),
            });
            continue;
        };
        members.push(role, WayFragment::new(way.id, vertices));
    }
    Ok(members)
}

fn report_assembly(relation: &Relation, role: Role, assembly: &Assembly, log: &mut IssueLog) {
    for failure in &assembly.failures {
        log.report(match failure {
            AssemblyFailure::Unclosed { ways, .. } => InterpretIssue::UnclosedRing {
                relation: relation.key(),
                role,
                ways: ways.clone(),
            },
            AssemblyFailure::Degenerate { ways, coords } => InterpretIssue::DegenerateRing {
                entity: relation.key(),
                ways: ways.clone(),
                coords: *coords,
            },
        });
    }
}
