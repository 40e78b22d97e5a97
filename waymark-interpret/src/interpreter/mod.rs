//! Feature assembly: turning one OSM entity into zero or more features.
//!
//! The interpreter classifies the entity, resolves whatever it references
//! through a [`PrimitiveSource`], and hands way fragments to the ring
//! assembler and polygon nester. Recoverable problems become
//! [`InterpretIssue`]s on the returned [`Interpretation`]; only malformed
//! input and source backend failures surface as [`InterpretError`].

use geo::Coord;
use log::{debug, warn};
use waymark_core::{Feature, Geometry, Node, OsmGeo, OsmGeoKey, OsmGeoType, PrimitiveSource, Way};

use crate::assemble::Vertex;
use crate::classify::{GeometryKind, TagClassifier};
use crate::config::InterpreterConfig;
use crate::error::InterpretError;
use crate::issue::{InterpretIssue, IssueLog};

mod multipolygon;
mod resolve;

use resolve::Resolver;

/// Features derived from one entity, with the issues met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    /// Key of the interpreted entity.
    pub key: OsmGeoKey,
    /// Derived features, possibly none.
    pub features: Vec<Feature>,
    /// Non-fatal problems, in the order they were found.
    pub issues: Vec<InterpretIssue>,
}

impl Interpretation {
    /// Discard the issues and keep the features.
    #[must_use]
    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

/// Combined result of [`Interpreter::interpret_batch`].
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Features from every entity that interpreted without a fatal error.
    pub features: Vec<Feature>,
    /// Issues from those entities.
    pub issues: Vec<InterpretIssue>,
    /// One entry per entity whose interpretation failed.
    pub errors: Vec<InterpretError>,
}

/// Interprets OSM entities into features.
///
/// # Examples
/// ```
/// use waymark_core::{MemorySnapshot, Node, OsmGeo, Tags, Way};
/// use waymark_interpret::Interpreter;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut source = MemorySnapshot::new();
/// for (id, lat, lon) in [(1, 0.0, 0.0), (2, 0.0, 1.0), (3, 1.0, 1.0)] {
///     source.add_or_update(Node::new(id, lat, lon));
/// }
/// let pond = Way::new(10, vec![1, 2, 3, 1], Tags::from([("natural", "water")]))?;
///
/// let interpretation = Interpreter::new().interpret(&OsmGeo::Way(pond), &source)?;
/// assert_eq!(interpretation.features.len(), 1);
/// assert!(interpretation.issues.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Interpreter {
    config: InterpreterConfig,
    classifier: TagClassifier,
}

impl Interpreter {
    /// Construct an interpreter using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Construct an interpreter with explicit configuration.
    #[must_use]
    pub fn with_config(config: InterpreterConfig) -> Self {
        let classifier = TagClassifier::new(config.rules.clone());
        Self { config, classifier }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Classifier built from the configured rules.
    #[must_use]
    pub const fn classifier(&self) -> &TagClassifier {
        &self.classifier
    }

    /// Interpret `entity`, resolving references through `source`.
    ///
    /// # Errors
    /// Returns [`InterpretError::MalformedWay`] when `entity` is a way with
    /// fewer than two node references and [`InterpretError::Source`] when the
    /// source fails for a reason other than a missing primitive.
    pub fn interpret<S: PrimitiveSource + ?Sized>(
        &self,
        entity: &OsmGeo,
        source: &S,
    ) -> Result<Interpretation, InterpretError> {
        let key = entity.key();
        let mut log = IssueLog::default();
        let mut resolver = Resolver::new(source);
        let features = match entity {
            OsmGeo::Node(node) => self.interpret_node(node),
            OsmGeo::Way(way) => self.interpret_way(way, &mut resolver, &mut log)?,
            OsmGeo::Relation(relation) => {
                multipolygon::interpret(&self.classifier, relation, &mut resolver, &mut log)?
            }
        };
        let issues = log.into_issues();
        debug!(
            "Interpreted {key} into {} feature(s) with {} issue(s)",
            features.len(),
            issues.len()
        );
        Ok(Interpretation {
            key,
            features,
            issues,
        })
    }

    /// Fetch `key` from `source` and interpret it. A key the source does not
    /// hold yields an empty interpretation with a
    /// [`InterpretIssue::MissingEntity`] issue.
    ///
    /// # Errors
    /// As [`Interpreter::interpret`], plus [`InterpretError::Source`] when
    /// fetching `key` itself fails in the backend.
    pub fn interpret_key<S: PrimitiveSource + ?Sized>(
        &self,
        key: OsmGeoKey,
        source: &S,
    ) -> Result<Interpretation, InterpretError> {
        match source.get(key) {
            Ok(entity) => self.interpret(&entity, source),
            Err(err) if err.is_not_found() => {
                let mut log = IssueLog::default();
                log.report(InterpretIssue::MissingEntity { entity: key });
                Ok(Interpretation {
                    key,
                    features: Vec::new(),
                    issues: log.into_issues(),
                })
            }
            Err(source) => Err(InterpretError::Source {
                entity: key,
                source,
            }),
        }
    }

    /// Interpret every key in `keys`, continuing past entities that fail.
    #[must_use]
    pub fn interpret_batch<S, I>(&self, keys: I, source: &S) -> BatchOutcome
    where
        S: PrimitiveSource + ?Sized,
        I: IntoIterator<Item = OsmGeoKey>,
    {
        let mut outcome = BatchOutcome::default();
        for key in keys {
            match self.interpret_key(key, source) {
                Ok(interpretation) => {
                    outcome.features.extend(interpretation.features);
                    outcome.issues.extend(interpretation.issues);
                }
                Err(error) => {
                    warn!("Failed to interpret {key}: {error}");
                    outcome.errors.push(error);
                }
            }
        }
        debug!(
            "Batch produced {} feature(s), {} issue(s) and {} error(s)",
            outcome.features.len(),
            outcome.issues.len(),
            outcome.errors.len()
        );
        outcome
    }

    fn interpret_node(&self, node: &Node) -> Vec<Feature> {
        if node.tags.is_empty() && !self.config.include_untagged_nodes {
            debug!("Skipping untagged {}", node.key());
            return Vec::new();
        }
        vec![Feature::new(
            node.key(),
            Geometry::point(node.coord()),
            node.tags.clone(),
        )]
    }

    fn interpret_way<S: PrimitiveSource + ?Sized>(
        &self,
        way: &Way,
        resolver: &mut Resolver<'_, S>,
        log: &mut IssueLog,
    ) -> Result<Vec<Feature>, InterpretError> {
        let key = way.key();
        if way.nodes.len() < 2 {
            return Err(InterpretError::MalformedWay {
                way: key,
                count: way.nodes.len(),
            });
        }
        let kind = self.classifier.classify(OsmGeoType::Way, &way.tags);
        let geometry = match kind {
            GeometryKind::Area if !way.is_closed() => {
                log.report(InterpretIssue::UnclosedArea { way: key });
                return Ok(Vec::new());
            }
            GeometryKind::Area => {
                let Some(vertices) = resolver.complete_vertices(key, &way.nodes, log)? else {
                    log.report(InterpretIssue::IncompleteWay { entity: key, way: key });
                    return Ok(Vec::new());
                };
                let coords = coords(vertices);
                let count = coords.len();
                match Geometry::linear_ring(coords) {
                    Ok(ring) => ring,
                    Err(_) => {
                        log.report(InterpretIssue::DegenerateRing {
                            entity: key,
                            ways: vec![way.id],
                            coords: count,
                        });
                        return Ok(Vec::new());
                    }
                }
            }
            GeometryKind::Line => {
                let coords = coords(resolver.vertices(key, &way.nodes, log)?);
                let count = coords.len();
                match Geometry::line_string(coords) {
                    Ok(line) => line,
                    Err(_) => {
                        log.report(InterpretIssue::EmptyLine {
                            way: key,
                            coords: count,
                        });
                        return Ok(Vec::new());
                    }
                }
            }
            GeometryKind::Point | GeometryKind::Unrecognized => {
                debug!("Skipping {key} classified as {kind}");
                return Ok(Vec::new());
            }
        };
        Ok(vec![Feature::new(key, geometry, way.tags.clone())])
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn coords(vertices: Vec<Vertex>) -> Vec<Coord<f64>> {
    vertices.into_iter().map(|vertex| vertex.coord).collect()
}

/// Interpret `entity` with the default configuration and return its features.
///
/// # Errors
/// See [`Interpreter::interpret`].
pub fn interpret<S: PrimitiveSource + ?Sized>(
    entity: &OsmGeo,
    source: &S,
) -> Result<Vec<Feature>, InterpretError> {
    Interpreter::new()
        .interpret(entity, source)
        .map(Interpretation::into_features)
}

#[cfg(test)]
mod tests;
