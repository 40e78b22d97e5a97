use std::collections::HashMap;

use geo::Coord;
use waymark_core::{OsmGeoKey, PrimitiveSource, SourceError, Way};

use crate::assemble::Vertex;
use crate::error::InterpretError;
use crate::issue::{InterpretIssue, IssueLog};

/// Source lookups for one interpretation.
///
/// Node positions are cached for the lifetime of the call so a node shared by
/// several member ways is fetched, and reported missing, only once.
pub(super) struct Resolver<'s, S: ?Sized> {
    source: &'s S,
    nodes: HashMap<i64, Option<Coord<f64>>>,
}

impl<'s, S: PrimitiveSource + ?Sized> Resolver<'s, S> {
    pub(super) fn new(source: &'s S) -> Self {
        Self {
            source,
            nodes: HashMap::new(),
        }
    }

    /// Resolve `nodes` in order, leaving out and reporting missing ones.
    pub(super) fn vertices(
        &mut self,
        entity: OsmGeoKey,
        nodes: &[i64],
        log: &mut IssueLog,
    ) -> Result<Vec<Vertex>, InterpretError> {
        let mut vertices = Vec::with_capacity(nodes.len());
        for &node in nodes {
            if let Some(coord) = self.coord(entity, node, log)? {
                vertices.push(Vertex::new(node, coord));
            }
        }
        Ok(vertices)
    }

    /// Resolve every one of `nodes`, or `None` when any is missing. Missing
    /// nodes are still reported individually.
    pub(super) fn complete_vertices(
        &mut self,
        entity: OsmGeoKey,
        nodes: &[i64],
        log: &mut IssueLog,
    ) -> Result<Option<Vec<Vertex>>, InterpretError> {
        let vertices = self.vertices(entity, nodes, log)?;
        Ok((vertices.len() == nodes.len()).then_some(vertices))
    }

    /// Fetch a relation member way, reporting it when absent.
    pub(super) fn member_way(
        &self,
        relation: OsmGeoKey,
        id: i64,
        log: &mut IssueLog,
    ) -> Result<Option<Way>, InterpretError> {
        match self.source.get_way(id) {
            Ok(way) => Ok(Some(way)),
            Err(err) if err.is_not_found() => {
                log.report(InterpretIssue::MissingMember {
                    relation,
                    member: OsmGeoKey::way(id),
                });
                Ok(None)
            }
            Err(source) => Err(fatal(relation, source)),
        }
    }

    fn coord(
        &mut self,
        entity: OsmGeoKey,
        node: i64,
        log: &mut IssueLog,
    ) -> Result<Option<Coord<f64>>, InterpretError> {
        if let Some(cached) = self.nodes.get(&node) {
            return Ok(*cached);
        }
        let resolved = match self.source.get_node(node) {
            Ok(found) => Some(found.coord()),
            Err(err) if err.is_not_found() => {
                log.report(InterpretIssue::MissingNode { entity, node });
                None
            }
            Err(source) => return Err(fatal(entity, source)),
        };
        self.nodes.insert(node, resolved);
        Ok(resolved)
    }
}

const fn fatal(entity: OsmGeoKey, source: SourceError) -> InterpretError {
    InterpretError::Source { entity, source }
}
