//! Unit coverage for per-entity interpretation.

use super::*;
use rstest::{fixture, rstest};
use waymark_core::test_support::{FailingSource, multipolygon, square_with_hole_nodes, way};
use waymark_core::{Member, MemorySnapshot, Relation, Tags};

#[fixture]
fn source() -> MemorySnapshot {
    let mut source = square_with_hole_nodes();
    source.add_or_update(way(1, &[1, 2, 3, 4, 1], &[("building", "yes")]));
    source.add_or_update(way(2, &[5, 6, 7, 8, 5], &[]));
    source.add_or_update(way(3, &[9, 10, 11, 12, 9], &[]));
    source.add_or_update(way(4, &[5, 6, 7], &[]));
    source.add_or_update(way(5, &[7, 8, 5], &[]));
    source.add_or_update(way(6, &[1, 2, 3], &[]));
    source
}

#[fixture]
fn interpreter() -> Interpreter {
    Interpreter::new()
}

fn relation_entity(relation: Relation) -> OsmGeo {
    OsmGeo::Relation(relation)
}

#[rstest]
fn tagged_node_becomes_a_point(interpreter: Interpreter, source: MemorySnapshot) {
    let node = Node::with_tags(50, 52.5, 13.4, Tags::from([("amenity", "bench")]));
    let result = interpreter
        .interpret(&OsmGeo::Node(node), &source)
        .expect("node interprets");
    let feature = result.features.first().expect("one feature");
    assert_eq!(result.features.len(), 1);
    assert_eq!(
        feature.geometry,
        Geometry::point(Coord { x: 13.4, y: 52.5 })
    );
    assert!(feature.attributes.contains_key_value("amenity", "bench"));
}

#[rstest]
#[case(true, 1)]
#[case(false, 0)]
fn untagged_nodes_follow_configuration(
    source: MemorySnapshot,
    #[case] include: bool,
    #[case] expected: usize,
) {
    let interpreter = Interpreter::with_config(InterpreterConfig {
        include_untagged_nodes: include,
        ..InterpreterConfig::default()
    });
    let result = interpreter
        .interpret(&OsmGeo::Node(Node::new(1, 0.0, 0.0)), &source)
        .expect("node interprets");
    assert_eq!(result.features.len(), expected);
    assert!(result.issues.is_empty());
}

#[rstest]
#[case(("area", "yes"))]
#[case(("natural", "water"))]
fn closed_area_way_becomes_its_own_ring(
    interpreter: Interpreter,
    source: MemorySnapshot,
    #[case] tag: (&str, &str),
) {
    let area = way(20, &[1, 2, 3, 4, 1], &[tag]);
    let result = interpreter
        .interpret(&OsmGeo::Way(area), &source)
        .expect("way interprets");
    assert_eq!(result.features.len(), 1);
    let feature = result.features.first().expect("one feature");
    let ring = feature.geometry.as_linear_ring().expect("ring geometry");
    let expected: Vec<Coord<f64>> = [1, 2, 3, 4, 1]
        .iter()
        .map(|id| source.get_node(*id).expect("fixture node").coord())
        .collect();
    assert_eq!(ring.coords(), expected.as_slice());
    assert!(feature.attributes.contains_key_value(tag.0, tag.1));
    assert_eq!(feature.source, OsmGeoKey::way(20));
}

#[rstest]
fn untagged_way_becomes_a_line(interpreter: Interpreter, source: MemorySnapshot) {
    let road = way(21, &[1, 2, 3], &[("highway", "residential")]);
    let result = interpreter
        .interpret(&OsmGeo::Way(road), &source)
        .expect("way interprets");
    let feature = result.features.first().expect("one feature");
    assert!(matches!(&feature.geometry, Geometry::LineString(line) if line.0.len() == 3));
}

#[rstest]
fn area_tagged_open_way_is_reported(interpreter: Interpreter, source: MemorySnapshot) {
    let open = way(22, &[1, 2, 3], &[("area", "yes")]);
    let result = interpreter
        .interpret(&OsmGeo::Way(open), &source)
        .expect("way interprets");
    assert!(result.features.is_empty());
    assert_eq!(
        result.issues,
        vec![InterpretIssue::UnclosedArea {
            way: OsmGeoKey::way(22)
        }]
    );
}

#[rstest]
fn way_with_one_node_is_rejected(interpreter: Interpreter, source: MemorySnapshot) {
    let stub = way(23, &[1], &[("highway", "path")]);
    let err = interpreter
        .interpret(&OsmGeo::Way(stub), &source)
        .expect_err("malformed way");
    assert!(matches!(
        err,
        InterpretError::MalformedWay { count: 1, .. }
    ));
    assert_eq!(err.key(), OsmGeoKey::way(23));
}

#[rstest]
fn missing_line_node_is_skipped_and_reported(interpreter: Interpreter, source: MemorySnapshot) {
    let road = way(24, &[1, 99, 2], &[("highway", "service")]);
    let result = interpreter
        .interpret(&OsmGeo::Way(road), &source)
        .expect("way interprets");
    assert!(matches!(
        result.features.first().map(|feature| &feature.geometry),
        Some(Geometry::LineString(line)) if line.0.len() == 2
    ));
    assert_eq!(
        result.issues,
        vec![InterpretIssue::MissingNode {
            entity: OsmGeoKey::way(24),
            node: 99,
        }]
    );
}

#[rstest]
fn line_left_with_one_coordinate_is_reported(interpreter: Interpreter, source: MemorySnapshot) {
    let road = way(25, &[1, 98, 99], &[("highway", "service")]);
    let result = interpreter
        .interpret(&OsmGeo::Way(road), &source)
        .expect("way interprets");
    assert!(result.features.is_empty());
    assert_eq!(
        result.issues.last(),
        Some(&InterpretIssue::EmptyLine {
            way: OsmGeoKey::way(25),
            coords: 1,
        })
    );
}

#[rstest]
fn area_way_with_a_missing_node_yields_nothing(interpreter: Interpreter, source: MemorySnapshot) {
    let area = way(27, &[1, 2, 99, 4, 1], &[("area", "yes")]);
    let result = interpreter
        .interpret(&OsmGeo::Way(area), &source)
        .expect("way interprets");
    assert!(result.features.is_empty());
    let key = OsmGeoKey::way(27);
    assert_eq!(
        result.issues,
        vec![
            InterpretIssue::MissingNode {
                entity: key,
                node: 99,
            },
            InterpretIssue::IncompleteWay {
                entity: key,
                way: key,
            },
        ]
    );
}

#[rstest]
fn backend_failure_is_fatal(interpreter: Interpreter, source: MemorySnapshot) {
    let failing = FailingSource::new(source, [OsmGeoKey::node(2)]);
    let road = way(26, &[1, 2, 3], &[("highway", "service")]);
    let err = interpreter
        .interpret(&OsmGeo::Way(road), &failing)
        .expect_err("backend failure");
    let InterpretError::Source { entity, source } = &err else {
        panic!("expected a source error, got {err:?}");
    };
    assert_eq!(*entity, OsmGeoKey::way(26));
    assert_eq!(source.key(), OsmGeoKey::node(2));
}

#[rstest]
fn one_outer_yields_a_ring_with_relation_tags(interpreter: Interpreter, source: MemorySnapshot) {
    let relation = multipolygon(100, &[(1, "outer")]);
    let result = interpreter
        .interpret(&relation_entity(relation), &source)
        .expect("relation interprets");
    assert_eq!(result.features.len(), 1);
    let feature = result.features.first().expect("one feature");
    assert!(feature.geometry.as_linear_ring().is_some());
    assert!(feature.attributes.contains_key_value("type", "multipolygon"));
    assert!(!feature.attributes.contains_key("building"));
    assert_eq!(feature.source, OsmGeoKey::relation(100));
}

#[rstest]
#[case(&[(1, "outer"), (2, "inner")], 1)]
#[case(&[(1, "outer"), (2, "inner"), (3, "inner")], 2)]
#[case(&[(1, "outer"), (4, "inner"), (5, "inner")], 1)]
#[case(&[(6, "outer"), (7, "outer"), (2, "inner")], 1)]
fn multipolygon_holes_are_counted(
    interpreter: Interpreter,
    mut source: MemorySnapshot,
    #[case] members: &[(i64, &str)],
    #[case] holes: usize,
) {
    source.add_or_update(way(7, &[3, 4, 1], &[]));
    let relation = multipolygon(101, members);
    let result = interpreter
        .interpret(&relation_entity(relation), &source)
        .expect("relation interprets");
    assert_eq!(result.features.len(), 1);
    let feature = result.features.first().expect("one feature");
    assert!(feature.geometry.as_polygon().is_some());
    assert_eq!(feature.geometry.hole_count(), holes);
    assert!(result.issues.is_empty(), "unexpected issues: {:?}", result.issues);
}

#[rstest]
fn non_multipolygon_relation_is_unsupported(interpreter: Interpreter, source: MemorySnapshot) {
    let route = Relation::new(
        102,
        Tags::from([("type", "route")]),
        vec![Member::way(1, "")],
    );
    let result = interpreter
        .interpret(&relation_entity(route), &source)
        .expect("relation interprets");
    assert!(result.features.is_empty());
    assert_eq!(
        result.issues,
        vec![InterpretIssue::UnsupportedRelation {
            relation: OsmGeoKey::relation(102)
        }]
    );
}

#[rstest]
fn area_no_suppresses_multipolygons(interpreter: Interpreter, source: MemorySnapshot) {
    let mut relation = multipolygon(103, &[(1, "outer")]);
    relation.tags.insert("area", "no");
    let result = interpreter
        .interpret(&relation_entity(relation), &source)
        .expect("relation interprets");
    assert!(result.features.is_empty());
}

#[rstest]
fn skipped_members_are_reported_and_the_rest_used(
    interpreter: Interpreter,
    source: MemorySnapshot,
) {
    let mut relation = multipolygon(
        104,
        &[(1, "outer"), (2, "inner"), (2, "inner"), (77, "inner"), (3, "subarea")],
    );
    relation
        .members
        .push(Member::new(OsmGeoType::Node, 5, "outer"));
    let result = interpreter
        .interpret(&relation_entity(relation), &source)
        .expect("relation interprets");
    let key = OsmGeoKey::relation(104);
    assert_eq!(
        result.issues,
        vec![
            InterpretIssue::DuplicateMember {
                relation: key,
                member: OsmGeoKey::way(2),
                role: crate::Role::Inner,
            },
            InterpretIssue::MissingMember {
                relation: key,
                member: OsmGeoKey::way(77),
            },
            InterpretIssue::UnsupportedMember {
                relation: key,
                member: OsmGeoKey::way(3),
                role: "subarea".to_owned(),
            },
            InterpretIssue::UnsupportedMember {
                relation: key,
                member: OsmGeoKey::node(5),
                role: "outer".to_owned(),
            },
        ]
    );
    let feature = result.features.first().expect("one feature");
    assert_eq!(feature.geometry.hole_count(), 1);
}

#[rstest]
fn unclosed_outer_yields_nothing(interpreter: Interpreter, source: MemorySnapshot) {
    let relation = multipolygon(105, &[(6, "outer"), (2, "inner")]);
    let result = interpreter
        .interpret(&relation_entity(relation), &source)
        .expect("relation interprets");
    assert!(result.features.is_empty());
    let key = OsmGeoKey::relation(105);
    assert_eq!(
        result.issues,
        vec![
            InterpretIssue::UnclosedRing {
                relation: key,
                role: crate::Role::Outer,
                ways: vec![6],
            },
            InterpretIssue::OrphanInner {
                relation: key,
                ways: vec![2],
            },
        ]
    );
}

#[rstest]
fn degenerate_member_way_is_reported(interpreter: Interpreter, mut source: MemorySnapshot) {
    source.add_or_update(way(8, &[5], &[]));
    let relation = multipolygon(106, &[(1, "outer"), (8, "inner")]);
    let result = interpreter
        .interpret(&relation_entity(relation), &source)
        .expect("relation interprets");
    assert_eq!(
        result.issues,
        vec![InterpretIssue::DegenerateWay {
            relation: OsmGeoKey::relation(106),
            member: OsmGeoKey::way(8),
        }]
    );
    assert_eq!(result.features.len(), 1);
}

#[rstest]
#[case::inner(&[(1, "outer"), (31, "inner")], 1)]
#[case::outer(&[(32, "outer")], 0)]
fn member_with_a_missing_node_is_skipped_whole(
    interpreter: Interpreter,
    mut source: MemorySnapshot,
    #[case] members: &[(i64, &str)],
    #[case] features: usize,
) {
    source.add_or_update(way(31, &[5, 6, 97, 8, 5], &[]));
    source.add_or_update(way(32, &[1, 2, 97, 4, 1], &[]));
    let relation = multipolygon(109, members);
    let result = interpreter
        .interpret(&relation_entity(relation), &source)
        .expect("relation interprets");
    assert_eq!(result.features.len(), features);
    assert!(
        result
            .features
            .iter()
            .all(|feature| feature.geometry.as_linear_ring().is_some()),
        "no reshaped rings or holes expected: {:?}",
        result.features
    );
    let key = OsmGeoKey::relation(109);
    let skipped = members.last().map(|(id, _)| OsmGeoKey::way(*id));
    assert!(result.issues.contains(&InterpretIssue::MissingNode {
        entity: key,
        node: 97,
    }));
    assert_eq!(
        result.issues.iter().find_map(|issue| match issue {
            InterpretIssue::IncompleteWay { way, .. } => Some(*way),
            _ => None,
        }),
        skipped
    );
}

/// Add a square way `way_id` with corners `min`..`max` on fresh nodes
/// numbered from `first_node`.
fn add_square(source: &mut MemorySnapshot, way_id: i64, first_node: i64, min: f64, max: f64) {
    let corners = [(min, min), (max, min), (max, max), (min, max)];
    let ids: Vec<i64> = (first_node..).take(corners.len()).collect();
    for (id, (x, y)) in ids.iter().zip(corners) {
        source.add_or_update(Node::new(*id, y, x));
    }
    let mut ring = ids;
    ring.extend(ring.first().copied());
    source.add_or_update(way(way_id, &ring, &[]));
}

#[rstest]
fn island_in_a_lake_keeps_its_own_pond(interpreter: Interpreter) {
    let mut source = MemorySnapshot::new();
    add_square(&mut source, 40, 100, 0.0, 10.0);
    add_square(&mut source, 41, 110, 1.0, 9.0);
    add_square(&mut source, 42, 120, 4.0, 6.0);
    add_square(&mut source, 43, 130, 4.5, 5.5);
    let relation = multipolygon(
        110,
        &[(40, "outer"), (41, "inner"), (42, "outer"), (43, "inner")],
    );
    let result = interpreter
        .interpret(&relation_entity(relation), &source)
        .expect("relation interprets");
    assert!(result.issues.is_empty(), "unexpected issues: {:?}", result.issues);
    let holes: Vec<usize> = result
        .features
        .iter()
        .map(|feature| feature.geometry.hole_count())
        .collect();
    assert_eq!(holes, vec![1, 1]);
}

#[rstest]
fn missing_key_is_an_issue(interpreter: Interpreter, source: MemorySnapshot) {
    let result = interpreter
        .interpret_key(OsmGeoKey::relation(404), &source)
        .expect("missing keys are not fatal");
    assert!(result.features.is_empty());
    assert_eq!(
        result.issues,
        vec![InterpretIssue::MissingEntity {
            entity: OsmGeoKey::relation(404)
        }]
    );
}

#[rstest]
fn batch_continues_past_failures(interpreter: Interpreter, mut source: MemorySnapshot) {
    source.add_or_update(multipolygon(107, &[(1, "outer"), (2, "inner")]));
    source.add_or_update(way(9, &[1], &[]));
    let outcome = interpreter.interpret_batch(
        [
            OsmGeoKey::way(9),
            OsmGeoKey::relation(107),
            OsmGeoKey::way(404),
            OsmGeoKey::way(1),
        ],
        &source,
    );
    assert_eq!(outcome.features.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.errors.first().map(InterpretError::key),
        Some(OsmGeoKey::way(9))
    );
    assert_eq!(
        outcome.issues,
        vec![InterpretIssue::MissingEntity {
            entity: OsmGeoKey::way(404)
        }]
    );
}

#[rstest]
fn free_function_uses_defaults(source: MemorySnapshot) {
    let relation = multipolygon(108, &[(1, "outer"), (4, "inner"), (5, "inner")]);
    let features = interpret(&relation_entity(relation), &source).expect("relation interprets");
    assert_eq!(features.len(), 1);
}
