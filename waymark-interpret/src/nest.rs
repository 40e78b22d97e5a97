//! Assigning inner rings to the outer rings that contain them.
//!
//! Containment is tested with `geo`'s coordinate position algorithm on the
//! first inner vertex that does not sit on the outer's boundary. An inner
//! ring whose every vertex touches the outer boundary counts as contained.
//!
//! Rules, applied in order:
//! 1. With no outer ring every inner is orphaned.
//! 2. With exactly one outer ring every inner is assigned to it.
//! 3. With several outers each inner joins the smallest outer that encloses
//!    it, or is orphaned when none does.
//! 4. Among the inners of one outer, a ring covered by another is dropped as
//!    nested and a ring whose interior meets another's is dropped as
//!    overlapping. The larger ring wins, and on equal area the earlier one
//!    does. Holes of one polygon therefore never overlap.

use std::fmt;

use geo::Relate;
use geo::coordinate_position::{CoordPos, CoordinatePosition};
use log::debug;
use waymark_core::{LinearRing, Polygon};

use crate::assemble::AssembledRing;

/// Role of a multipolygon member way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Role {
    /// Part of the exterior boundary.
    Outer,
    /// Part of a hole.
    Inner,
}

impl Role {
    /// Parse a member role string. Only `outer` and `inner` are recognised.
    #[must_use]
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "outer" => Some(Self::Outer),
            "inner" => Some(Self::Inner),
            _ => None,
        }
    }

    /// Canonical role string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outer => "outer",
            Self::Inner => "inner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inner ring that could not become a hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestingFailure {
    /// No outer ring encloses the inner ring.
    OrphanInner {
        /// Ways forming the inner ring.
        ways: Vec<i64>,
    },
    /// The inner ring lies inside another hole of the same outer ring.
    NestedInner {
        /// Ways forming the dropped ring.
        ways: Vec<i64>,
        /// Ways forming the enclosing inner ring.
        within: Vec<i64>,
    },
    /// The inner ring partly overlaps another hole of the same outer ring.
    OverlappingInner {
        /// Ways forming the dropped ring.
        ways: Vec<i64>,
        /// Ways forming the hole it overlaps.
        overlaps: Vec<i64>,
    },
}

/// Polygons built from one relation's rings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nesting {
    /// One polygon per outer ring, in outer order.
    pub polygons: Vec<Polygon>,
    /// Inner rings that were left out.
    pub failures: Vec<NestingFailure>,
}

/// Build polygons from `outers`, punching holes from `inners`.
#[must_use]
pub fn nest_rings(outers: &[AssembledRing], inners: &[AssembledRing]) -> Nesting {
    let mut failures = Vec::new();
    let mut assigned: Vec<Vec<usize>> = vec![Vec::new(); outers.len()];
    match outers {
        [] => failures.extend(inners.iter().map(|inner| NestingFailure::OrphanInner {
            ways: inner.ways.clone(),
        })),
        [_] => {
            if let Some(slot) = assigned.first_mut() {
                slot.extend(0..inners.len());
            }
        }
        _ => {
            let outer_shapes: Vec<geo::Polygon<f64>> =
                outers.iter().map(|outer| shape(&outer.ring)).collect();
            for (position, inner) in inners.iter().enumerate() {
                let host = outers
                    .iter()
                    .zip(&outer_shapes)
                    .enumerate()
                    .filter(|(_, (_, outer_shape))| encloses(outer_shape, &inner.ring))
                    .min_by(|(_, (left, _)), (_, (right, _))| {
                        left.ring.unsigned_area().total_cmp(&right.ring.unsigned_area())
                    })
                    .map(|(slot, _)| slot);
                match host.and_then(|slot| assigned.get_mut(slot)) {
                    Some(slot) => slot.push(position),
                    None => failures.push(NestingFailure::OrphanInner {
                        ways: inner.ways.clone(),
                    }),
                }
            }
        }
    }

    let polygons: Vec<Polygon> = outers
        .iter()
        .zip(assigned)
        .map(|(outer, candidates)| {
            let holes = separate_holes(inners, candidates, &mut failures);
            Polygon::new(outer.ring.clone(), holes)
        })
        .collect();
    debug!(
        "Nested {} inner ring(s) into {} polygon(s); {} left out",
        inners.len(),
        polygons.len(),
        failures.len()
    );
    Nesting { polygons, failures }
}

/// Holes for one outer from the `candidates` positions in `inners`.
///
/// Candidates are admitted largest first, on equal area the earlier one.
/// A candidate covered by an admitted hole is [`NestingFailure::NestedInner`];
/// one whose interior meets an admitted hole's is
/// [`NestingFailure::OverlappingInner`]. Admitted holes keep input order.
fn separate_holes(
    inners: &[AssembledRing],
    mut candidates: Vec<usize>,
    failures: &mut Vec<NestingFailure>,
) -> Vec<LinearRing> {
    let area = |position: usize| {
        inners
            .get(position)
            .map_or(0.0, |inner| inner.ring.unsigned_area())
    };
    candidates.sort_by(|&left, &right| {
        area(right)
            .total_cmp(&area(left))
            .then_with(|| left.cmp(&right))
    });

    let mut admitted: Vec<(usize, geo::Polygon<f64>)> = Vec::with_capacity(candidates.len());
    for position in candidates {
        let Some(inner) = inners.get(position) else {
            continue;
        };
        let candidate = shape(&inner.ring);
        let clash = admitted.iter().find_map(|(other, other_shape)| {
            let matrix = candidate.relate(other_shape);
            if matrix.is_coveredby() {
                Some((*other, true))
            } else if matrix.is_intersects() && !matrix.is_touches() {
                Some((*other, false))
            } else {
                None
            }
        });
        let Some((other, nested)) = clash else {
            admitted.push((position, candidate));
            continue;
        };
        let ways = inner.ways.clone();
        let other_ways = inners
            .get(other)
            .map(|ring| ring.ways.clone())
            .unwrap_or_default();
        failures.push(if nested {
            NestingFailure::NestedInner {
                ways,
                within: other_ways,
            }
        } else {
            NestingFailure::OverlappingInner {
                ways,
                overlaps: other_ways,
            }
        });
    }

    admitted.sort_by_key(|(position, _)| *position);
    admitted
        .into_iter()
        .filter_map(|(position, _)| inners.get(position).map(|inner| inner.ring.clone()))
        .collect()
}

fn shape(ring: &LinearRing) -> geo::Polygon<f64> {
    geo::Polygon::new(ring.as_line_string().clone(), Vec::new())
}

/// Whether `candidate` lies within `container`, judged by its first vertex
/// off the container boundary.
fn encloses(container: &geo::Polygon<f64>, candidate: &LinearRing) -> bool {
    for coord in candidate.coords() {
        match container.coordinate_position(coord) {
            CoordPos::Inside => return true,
            CoordPos::Outside => return false,
            CoordPos::OnBoundary => {}
        }
    }
    true
}
