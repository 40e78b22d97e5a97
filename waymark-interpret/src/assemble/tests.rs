//! Unit coverage for ring assembly.

use super::*;
use rstest::{fixture, rstest};

/// Unit-square corners plus a small square of nodes 5-8 inside it.
fn position(node: i64) -> Coord<f64> {
    let (x, y) = match node {
        1 => (0.0, 0.0),
        2 => (1.0, 0.0),
        3 => (1.0, 1.0),
        4 => (0.0, 1.0),
        5 => (0.25, 0.25),
        6 => (0.40, 0.25),
        7 => (0.40, 0.40),
        8 => (0.25, 0.40),
        other => (0.0, f64::from(i32::try_from(other).unwrap_or(0))),
    };
    Coord { x, y }
}

fn fragment(way: i64, nodes: &[i64]) -> WayFragment {
    WayFragment::new(
        way,
        nodes
            .iter()
            .map(|node| Vertex::new(*node, position(*node)))
            .collect(),
    )
}

#[fixture]
fn split_square() -> Vec<WayFragment> {
    vec![
        fragment(10, &[1, 2]),
        fragment(11, &[2, 3]),
        fragment(12, &[3, 4]),
        fragment(13, &[4, 1]),
    ]
}

fn canonical_rings(assembly: &Assembly) -> Vec<Vec<i64>> {
    let mut rings: Vec<Vec<i64>> = assembly
        .rings
        .iter()
        .map(AssembledRing::canonical_nodes)
        .collect();
    rings.sort();
    rings
}

#[rstest]
fn closed_fragment_is_a_ring_on_its_own() {
    let assembly = assemble_rings(&[fragment(1, &[1, 2, 3, 4, 1])]);
    assert_eq!(canonical_rings(&assembly), vec![vec![1, 2, 3, 4]]);
    assert!(assembly.failures.is_empty());
    let ring = assembly.rings.first().expect("one ring");
    assert_eq!(ring.ways, vec![1]);
    assert_eq!(ring.ring.len(), 5);
}

#[rstest]
fn joins_fragments_sharing_endpoints(split_square: Vec<WayFragment>) {
    let assembly = assemble_rings(&split_square);
    assert_eq!(canonical_rings(&assembly), vec![vec![1, 2, 3, 4]]);
    let ring = assembly.rings.first().expect("one ring");
    assert_eq!(ring.ways.len(), 4);
    assert_eq!(ring.nodes.first(), ring.nodes.last());
}

#[rstest]
fn reverses_fragments_pointing_the_wrong_way() {
    let fragments = [
        fragment(2, &[5, 6, 7]),
        fragment(3, &[5, 8, 7]),
    ];
    let assembly = assemble_rings(&fragments);
    assert_eq!(canonical_rings(&assembly), vec![vec![5, 6, 7, 8]]);
    assert!(assembly.failures.is_empty());
}

#[rstest]
fn input_order_does_not_change_the_outcome(split_square: Vec<WayFragment>) {
    let forward = assemble_rings(&split_square);
    let mut shuffled = split_square;
    shuffled.reverse();
    shuffled.swap(0, 2);
    let backward = assemble_rings(&shuffled);
    assert_eq!(forward, backward);
}

#[rstest]
fn gap_reports_the_whole_chain() {
    let fragments = [fragment(1, &[1, 2]), fragment(2, &[2, 3]), fragment(3, &[3, 4])];
    let assembly = assemble_rings(&fragments);
    assert!(assembly.rings.is_empty());
    assert_eq!(assembly.failures.len(), 1);
    let failure = assembly.failures.first().expect("one failure");
    let AssemblyFailure::Unclosed { ways, start, end } = failure else {
        panic!("expected an unclosed chain, got {failure:?}");
    };
    let mut ways = ways.clone();
    ways.sort_unstable();
    assert_eq!(ways, vec![1, 2, 3]);
    let mut ends = [*start, *end];
    ends.sort_unstable();
    assert_eq!(ends, [1, 4]);
}

#[rstest]
fn unrelated_leftovers_fail_separately(split_square: Vec<WayFragment>) {
    let mut fragments = split_square;
    fragments.push(fragment(20, &[5, 6]));
    fragments.push(fragment(21, &[7, 8]));
    let assembly = assemble_rings(&fragments);
    assert_eq!(assembly.rings.len(), 1);
    let mut failed: Vec<&[i64]> = assembly.failures.iter().map(AssemblyFailure::ways).collect();
    failed.sort_unstable();
    assert_eq!(failed, vec![&[20][..], &[21][..]]);
}

#[rstest]
fn two_node_loop_is_degenerate() {
    let fragments = [fragment(1, &[1, 2]), fragment(2, &[2, 1])];
    let assembly = assemble_rings(&fragments);
    assert!(assembly.rings.is_empty());
    assert_eq!(
        assembly.failures,
        vec![AssemblyFailure::Degenerate {
            ways: vec![1, 2],
            coords: 3,
        }]
    );
}

#[rstest]
fn single_vertex_fragment_is_degenerate() {
    let assembly = assemble_rings(&[fragment(9, &[5])]);
    assert_eq!(
        assembly.failures,
        vec![AssemblyFailure::Degenerate {
            ways: vec![9],
            coords: 1,
        }]
    );
}

#[rstest]
fn prefers_the_fragment_that_closes_the_ring() {
    // The spur at node 3 ranks before the closing fragment.
    let fragments = [
        fragment(1, &[1, 2, 3]),
        fragment(2, &[3, 5]),
        fragment(3, &[3, 4, 1]),
    ];
    let assembly = assemble_rings(&fragments);
    assert_eq!(canonical_rings(&assembly), vec![vec![1, 2, 3, 4]]);
    assert_eq!(
        assembly
            .failures
            .iter()
            .map(AssemblyFailure::ways)
            .collect::<Vec<_>>(),
        vec![&[2][..]]
    );
}

#[rstest]
fn spur_off_a_ring_is_left_over() {
    let fragments = [
        fragment(1, &[1, 2]),
        fragment(2, &[2, 9]),
        fragment(3, &[2, 3]),
        fragment(4, &[3, 1]),
    ];
    let assembly = assemble_rings(&fragments);
    assert_eq!(canonical_rings(&assembly), vec![vec![1, 2, 3]]);
    let failure = assembly.failures.first().expect("one failure");
    assert_eq!(assembly.failures.len(), 1);
    let AssemblyFailure::Unclosed { ways, start, end } = failure else {
        panic!("expected an unclosed chain, got {failure:?}");
    };
    assert_eq!(ways, &vec![2]);
    let mut ends = [*start, *end];
    ends.sort_unstable();
    assert_eq!(ends, [2, 9]);
}

#[rstest]
fn dead_end_branch_is_backtracked_out_of() {
    // Way 2 bridges the triangle 1-2-3 to the triangle 5-6-7. It ranks
    // before way 3, so the search walks into the far triangle first.
    let fragments = [
        fragment(1, &[1, 2]),
        fragment(2, &[2, 5]),
        fragment(3, &[2, 3]),
        fragment(4, &[3, 1]),
        fragment(5, &[5, 6]),
        fragment(6, &[6, 7]),
        fragment(7, &[7, 5]),
    ];
    let assembly = assemble_rings(&fragments);
    assert_eq!(
        canonical_rings(&assembly),
        vec![vec![1, 2, 3], vec![5, 6, 7]]
    );
    assert_eq!(
        assembly
            .failures
            .iter()
            .map(AssemblyFailure::ways)
            .collect::<Vec<_>>(),
        vec![&[2][..]]
    );
}

#[rstest]
fn rings_touching_at_a_node_are_both_found() {
    let fragments = [
        fragment(1, &[1, 2]),
        fragment(2, &[2, 3]),
        fragment(3, &[3, 1]),
        fragment(4, &[1, 5]),
        fragment(5, &[5, 6, 1]),
    ];
    let assembly = assemble_rings(&fragments);
    assert_eq!(
        canonical_rings(&assembly),
        vec![vec![1, 2, 3], vec![1, 5, 6]]
    );
    assert!(assembly.failures.is_empty());
}

#[rstest]
fn separate_rings_are_all_found(split_square: Vec<WayFragment>) {
    let mut fragments = split_square;
    fragments.push(fragment(30, &[5, 6, 7]));
    fragments.push(fragment(31, &[7, 8, 5]));
    let assembly = assemble_rings(&fragments);
    assert_eq!(
        canonical_rings(&assembly),
        vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]
    );
}

#[rstest]
#[case(vec![3, 4, 1, 2, 3], vec![1, 2, 3, 4])]
#[case(vec![1, 4, 3, 2, 1], vec![1, 2, 3, 4])]
#[case(vec![7, 8, 5, 6, 7], vec![5, 6, 7, 8])]
fn canonical_nodes_ignore_start_and_direction(
    #[case] nodes: Vec<i64>,
    #[case] expected: Vec<i64>,
) {
    let coords = nodes.iter().map(|node| position(*node)).collect();
    let ring = AssembledRing {
        ring: LinearRing::new(coords).expect("valid ring"),
        nodes,
        ways: vec![1],
    };
    assert_eq!(ring.canonical_nodes(), expected);
}
