use std::collections::HashMap;

use super::WayFragment;

/// Maps a node id to the open fragments that start or end there.
///
/// Fragment slots are stored in rank order so lookups return candidates in a
/// deterministic order regardless of how the caller supplied the fragments.
#[derive(Debug, Default)]
pub(super) struct EndpointIndex {
    slots: HashMap<i64, Vec<usize>>,
}

impl EndpointIndex {
    /// Index `ranked` fragment slots. Closed fragments and single vertices
    /// never join with others and are left out.
    pub(super) fn build(fragments: &[WayFragment], ranked: &[usize]) -> Self {
        let mut slots: HashMap<i64, Vec<usize>> = HashMap::new();
        for &slot in ranked {
            let Some(fragment) = fragments.get(slot) else {
                continue;
            };
            if fragment.is_closed() || fragment.vertices().len() < 2 {
                continue;
            }
            let (Some(first), Some(last)) = (fragment.first_node(), fragment.last_node()) else {
                continue;
            };
            slots.entry(first).or_default().push(slot);
            slots.entry(last).or_default().push(slot);
        }
        Self { slots }
    }

    /// Flags, per slot of `fragments`, the fragments that cannot lie on any
    /// ring.
    ///
    /// A fragment with an endpoint no other fragment touches is dangling.
    /// Removing it can leave a neighbour dangling in turn, so pruning repeats
    /// until every remaining endpoint is shared.
    pub(super) fn dangling(&self, fragments: &[WayFragment]) -> Vec<bool> {
        let mut pruned = vec![false; fragments.len()];
        let mut degree: HashMap<i64, usize> = self
            .slots
            .iter()
            .map(|(node, slots)| (*node, slots.len()))
            .collect();
        let mut pending: Vec<i64> = degree
            .iter()
            .filter(|(_, count)| **count == 1)
            .map(|(node, _)| *node)
            .collect();
        while let Some(node) = pending.pop() {
            for &slot in self.touching(node) {
                match pruned.get_mut(slot) {
                    Some(flag) if !*flag => *flag = true,
                    _ => continue,
                }
                let Some(fragment) = fragments.get(slot) else {
                    continue;
                };
                for end in [fragment.first_node(), fragment.last_node()].into_iter().flatten() {
                    if let Some(count) = degree.get_mut(&end) {
                        *count = count.saturating_sub(1);
                        if *count == 1 {
                            pending.push(end);
                        }
                    }
                }
            }
        }
        pruned
    }

    /// Fragment slots touching `node`, in rank order.
    pub(super) fn touching(&self, node: i64) -> &[usize] {
        self.slots.get(&node).map_or(&[], Vec::as_slice)
    }
}
