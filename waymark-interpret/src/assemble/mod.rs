//! Ring assembly from way fragments.
//!
//! A multipolygon boundary is often split across several ways. The assembler
//! stitches fragments end to end through shared endpoint nodes until each
//! chain returns to its starting node.
//!
//! Fragments with an endpoint no other fragment shares are pruned first, as
//! they can never close. Rings are then searched depth first from each
//! remaining fragment, backtracking out of dead ends, so a stray way meeting
//! a ring at one of its nodes cannot break that ring.
//!
//! Responsibilities:
//! - Join fragments that share endpoint node ids, reversing them as needed.
//! - Use each fragment at most once.
//! - Report every fragment that could not take part in a closed ring.
//!
//! Invariants:
//! - The outcome depends only on the set of fragments, not on the order in
//!   which they are supplied. Fragments are ranked by way id (then node ids)
//!   before seeding, and candidates at a shared endpoint are tried in the
//!   same rank order.
//! - Ring buffers live in an arena indexed by ring-in-progress, so chains
//!   never alias one another's vertex storage.
//!
//! # Examples
//! ```
//! use geo::Coord;
//! use waymark_interpret::{Vertex, WayFragment, assemble_rings};
//!
//! let v = |node, x, y| Vertex::new(node, Coord { x, y });
//! let fragments = vec![
//!     WayFragment::new(2, vec![v(5, 0.25, 0.25), v(6, 0.40, 0.25), v(7, 0.40, 0.40)]),
//!     WayFragment::new(3, vec![v(7, 0.40, 0.40), v(8, 0.25, 0.40), v(5, 0.25, 0.25)]),
//! ];
//! let assembly = assemble_rings(&fragments);
//! assert_eq!(assembly.rings.len(), 1);
//! assert_eq!(assembly.rings[0].canonical_nodes(), vec![5, 6, 7, 8]);
//! assert!(assembly.failures.is_empty());
//! ```

use std::collections::HashSet;

use geo::Coord;
use log::debug;
use waymark_core::LinearRing;

mod index;

use index::EndpointIndex;

/// A resolved way node: its id and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// OSM node id.
    pub node: i64,
    /// Node position.
    pub coord: Coord<f64>,
}

impl Vertex {
    /// Construct a vertex.
    #[must_use]
    pub const fn new(node: i64, coord: Coord<f64>) -> Self {
        Self { node, coord }
    }
}

/// An ordered run of resolved vertices taken from one way.
#[derive(Debug, Clone, PartialEq)]
pub struct WayFragment {
    way: i64,
    vertices: Vec<Vertex>,
}

impl WayFragment {
    /// Construct a fragment of way `way`.
    #[must_use]
    pub const fn new(way: i64, vertices: Vec<Vertex>) -> Self {
        Self { way, vertices }
    }

    /// Id of the originating way.
    #[must_use]
    pub const fn way(&self) -> i64 {
        self.way
    }

    /// Vertices in way order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Node id of the first vertex.
    #[must_use]
    pub fn first_node(&self) -> Option<i64> {
        self.vertices.first().map(|vertex| vertex.node)
    }

    /// Node id of the last vertex.
    #[must_use]
    pub fn last_node(&self) -> Option<i64> {
        self.vertices.last().map(|vertex| vertex.node)
    }

    /// Whether the fragment already starts and ends at the same node.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.vertices.len() > 1 && self.first_node() == self.last_node()
    }

    fn node_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.vertices.iter().map(|vertex| vertex.node)
    }
}

/// A closed ring produced by the assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRing {
    /// Ring geometry.
    pub ring: LinearRing,
    /// Node ids along the ring, first equal to last.
    pub nodes: Vec<i64>,
    /// Ways that contributed, in traversal order.
    pub ways: Vec<i64>,
}

impl AssembledRing {
    /// Node ids with the closing repeat removed, rotated to start at the
    /// smallest id and oriented towards its smaller neighbour.
    ///
    /// Two rings with the same canonical nodes are the same ring regardless
    /// of traversal direction and starting vertex.
    #[must_use]
    pub fn canonical_nodes(&self) -> Vec<i64> {
        let open = self
            .nodes
            .split_last()
            .map_or(&[][..], |(_, rest)| rest);
        let Some(start) = open
            .iter()
            .enumerate()
            .min_by_key(|(_, node)| **node)
            .map(|(position, _)| position)
        else {
            return Vec::new();
        };
        let mut forward = open.to_vec();
        forward.rotate_left(start);
        let mut backward = forward.clone();
        if let Some(tail) = backward.get_mut(1..) {
            tail.reverse();
        }
        forward.min(backward)
    }
}

/// Why some fragments did not end up in a ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyFailure {
    /// The chain ran out of matching fragments before returning to its start.
    Unclosed {
        /// Ways in the chain, in traversal order.
        ways: Vec<i64>,
        /// Node at one open end.
        start: i64,
        /// Node at the other open end.
        end: i64,
    },
    /// The chain closed but has too few coordinates to form a ring, or a
    /// fragment had fewer than two vertices.
    Degenerate {
        /// Ways in the chain.
        ways: Vec<i64>,
        /// Coordinate count of the chain.
        coords: usize,
    },
}

impl AssemblyFailure {
    /// Ways affected by the failure.
    #[must_use]
    pub fn ways(&self) -> &[i64] {
        match self {
            Self::Unclosed { ways, .. } | Self::Degenerate { ways, .. } => ways,
        }
    }
}

/// Result of assembling a set of fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    /// Closed rings, in the order they were completed.
    pub rings: Vec<AssembledRing>,
    /// Chains that could not be closed.
    pub failures: Vec<AssemblyFailure>,
}

/// Stitch `fragments` into the maximal set of closed rings.
///
/// Every fragment is accounted for exactly once: either inside one of
/// [`Assembly::rings`] or inside one of [`Assembly::failures`].
#[must_use]
pub fn assemble_rings(fragments: &[WayFragment]) -> Assembly {
    let ranked = rank(fragments);
    let index = EndpointIndex::build(fragments, &ranked);
    let pruned = index.dangling(fragments);
    let mut consumed = pruned.clone();
    let mut arena = RingArena::default();

    for &seed in &ranked {
        if consumed.get(seed) != Some(&false) {
            continue;
        }
        let Some(fragment) = fragments.get(seed) else {
            continue;
        };
        if fragment.is_closed() || fragment.vertices.len() < 2 {
            take(&mut consumed, seed);
            arena.open(fragment);
            continue;
        }
        let search = RingSearch {
            fragments,
            index: &index,
            consumed: &consumed,
        };
        let Some(steps) = search.from_seed(seed) else {
            continue;
        };
        let ring_id = arena.open(fragment);
        for step in steps {
            take(&mut consumed, step.slot);
            if let (Some(buffer), Some(next)) = (arena.get_mut(ring_id), fragments.get(step.slot)) {
                buffer.append(next, step.reversed);
            }
        }
        take(&mut consumed, seed);
    }

    // Whatever is left cannot take part in any ring; report it in chains.
    let mut consumed: Vec<bool> = consumed
        .iter()
        .zip(&pruned)
        .map(|(taken, dangling)| *taken && !*dangling)
        .collect();
    for &seed in &ranked {
        if !take(&mut consumed, seed) {
            continue;
        }
        let Some(fragment) = fragments.get(seed) else {
            continue;
        };
        let ring_id = arena.open(fragment);
        if let Some(buffer) = arena.get_mut(ring_id) {
            chain(buffer, fragments, &index, &mut consumed);
        }
    }

    let assembly = arena.finish();
    debug!(
        "Assembled {} ring(s) from {} fragment(s); {} chain(s) failed, {} dangling fragment(s) pruned",
        assembly.rings.len(),
        fragments.len(),
        assembly.failures.len(),
        pruned.iter().filter(|dangling| **dangling).count()
    );
    assembly
}

fn rank(fragments: &[WayFragment]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..fragments.len()).collect();
    ranked.sort_by(|&a, &b| match (fragments.get(a), fragments.get(b)) {
        (Some(left), Some(right)) => left
            .way
            .cmp(&right.way)
            .then_with(|| left.node_ids().cmp(right.node_ids())),
        _ => a.cmp(&b),
    });
    ranked
}

/// Mark `slot` consumed, returning whether it was still available.
fn take(consumed: &mut [bool], slot: usize) -> bool {
    match consumed.get_mut(slot) {
        Some(flag) if !*flag => {
            *flag = true;
            true
        }
        _ => false,
    }
}

/// The node at the other end of `fragment` when entered at `node`, and
/// whether walking it that way reverses it.
fn far_end(fragment: &WayFragment, node: i64) -> Option<(i64, bool)> {
    if fragment.first_node() == Some(node) {
        fragment.last_node().map(|far| (far, false))
    } else {
        fragment.first_node().map(|far| (far, true))
    }
}

/// One fragment appended to a ring in progress.
#[derive(Debug, Clone, Copy)]
struct Step {
    slot: usize,
    reversed: bool,
}

/// Depth-first search for a simple cycle through a seed fragment.
///
/// Candidates at each junction are tried closing fragments first, then in
/// rank order. A branch that dead-ends or revisits a junction node is
/// abandoned and the next candidate is tried.
struct RingSearch<'a> {
    fragments: &'a [WayFragment],
    index: &'a EndpointIndex,
    consumed: &'a [bool],
}

impl RingSearch<'_> {
    /// Steps after `seed` that close a ring back to its first node.
    fn from_seed(&self, seed: usize) -> Option<Vec<Step>> {
        let fragment = self.fragments.get(seed)?;
        let (start, end) = (fragment.first_node()?, fragment.last_node()?);
        let mut on_path = vec![false; self.fragments.len()];
        if let Some(flag) = on_path.get_mut(seed) {
            *flag = true;
        }
        let mut visited = HashSet::from([start, end]);
        let mut path = Vec::new();
        self.extend(start, end, &mut path, &mut on_path, &mut visited)
            .then_some(path)
    }

    fn extend(
        &self,
        start: i64,
        end: i64,
        path: &mut Vec<Step>,
        on_path: &mut [bool],
        visited: &mut HashSet<i64>,
    ) -> bool {
        let candidates: Vec<(usize, i64, bool)> = self
            .index
            .touching(end)
            .iter()
            .copied()
            .filter(|slot| {
                self.consumed.get(*slot) == Some(&false) && on_path.get(*slot) == Some(&false)
            })
            .filter_map(|slot| {
                let (far, reversed) = far_end(self.fragments.get(slot)?, end)?;
                Some((slot, far, reversed))
            })
            .collect();
        let (closing, open): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|(_, far, _)| *far == start);
        if let Some(&(slot, _, reversed)) = closing.first() {
            path.push(Step { slot, reversed });
            return true;
        }
        for (slot, far, reversed) in open {
            if !visited.insert(far) {
                continue;
            }
            path.push(Step { slot, reversed });
            if let Some(flag) = on_path.get_mut(slot) {
                *flag = true;
            }
            if self.extend(start, far, path, on_path, visited) {
                return true;
            }
            path.pop();
            if let Some(flag) = on_path.get_mut(slot) {
                *flag = false;
            }
            visited.remove(&far);
        }
        false
    }
}

/// Extend `buffer` at its open end with unconsumed fragments until none
/// matches, then flip it once and extend the other end, so a failed chain is
/// reported in full.
fn chain(
    buffer: &mut RingBuffer,
    fragments: &[WayFragment],
    index: &EndpointIndex,
    consumed: &mut [bool],
) {
    let mut flipped = false;
    loop {
        let Some(end) = buffer.end_node() else {
            return;
        };
        if buffer.is_closed() {
            return;
        }
        let next = index
            .touching(end)
            .iter()
            .copied()
            .find(|slot| consumed.get(*slot) == Some(&false));
        match next.and_then(|slot| Some((slot, far_end(fragments.get(slot)?, end)?))) {
            Some((slot, (_, reversed))) => {
                take(consumed, slot);
                if let Some(fragment) = fragments.get(slot) {
                    buffer.append(fragment, reversed);
                }
            }
            None if !flipped => {
                buffer.reverse();
                flipped = true;
            }
            None => return,
        }
    }
}

/// Vertex storage for one ring in progress.
#[derive(Debug)]
struct RingBuffer {
    vertices: Vec<Vertex>,
    ways: Vec<i64>,
}

impl RingBuffer {
    fn start_node(&self) -> Option<i64> {
        self.vertices.first().map(|vertex| vertex.node)
    }

    fn end_node(&self) -> Option<i64> {
        self.vertices.last().map(|vertex| vertex.node)
    }

    fn is_closed(&self) -> bool {
        self.vertices.len() > 1 && self.start_node() == self.end_node()
    }

    /// Append `fragment` minus its shared first vertex.
    fn append(&mut self, fragment: &WayFragment, reversed: bool) {
        if reversed {
            self.vertices
                .extend(fragment.vertices.iter().rev().skip(1).copied());
        } else {
            self.vertices
                .extend(fragment.vertices.iter().skip(1).copied());
        }
        self.ways.push(fragment.way);
    }

    fn reverse(&mut self) {
        self.vertices.reverse();
        self.ways.reverse();
    }
}

/// Arena of ring buffers indexed by ring-in-progress.
#[derive(Debug, Default)]
struct RingArena {
    buffers: Vec<RingBuffer>,
}

impl RingArena {
    fn open(&mut self, seed: &WayFragment) -> usize {
        self.buffers.push(RingBuffer {
            vertices: seed.vertices.clone(),
            ways: vec![seed.way],
        });
        self.buffers.len() - 1
    }

    fn get_mut(&mut self, ring_id: usize) -> Option<&mut RingBuffer> {
        self.buffers.get_mut(ring_id)
    }

    fn finish(self) -> Assembly {
        let mut assembly = Assembly::default();
        for buffer in self.buffers {
            let coords = buffer.vertices.len();
            if !buffer.is_closed() {
                let failure = match (buffer.start_node(), buffer.end_node()) {
                    (Some(start), Some(end)) if coords > 1 => AssemblyFailure::Unclosed {
                        ways: buffer.ways,
                        start,
                        end,
                    },
                    _ => AssemblyFailure::Degenerate {
                        ways: buffer.ways,
                        coords,
                    },
                };
                assembly.failures.push(failure);
                continue;
            }
            let nodes: Vec<i64> = buffer.vertices.iter().map(|vertex| vertex.node).collect();
            let ring_coords = buffer.vertices.iter().map(|vertex| vertex.coord).collect();
            match LinearRing::new(ring_coords) {
                Ok(ring) => assembly.rings.push(AssembledRing {
                    ring,
                    nodes,
                    ways: buffer.ways,
                }),
                Err(_) => assembly.failures.push(AssemblyFailure::Degenerate {
                    ways: buffer.ways,
                    coords,
                }),
            }
        }
        assembly
    }
}

#[cfg(test)]
mod tests;
