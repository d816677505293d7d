use crate::error::OrphanReason;
use crate::graph::{GraphIndex, NodeKind};
use std::collections::VecDeque;

/// Classifies every node that is not connected to the pipeline.
///
/// Returns `(node index, reason)` pairs in ascending id order.
pub(super) fn find_orphans(index: &GraphIndex<'_>) -> Vec<(usize, OrphanReason)> {
    let mut reached = vec![false; index.len()];
    let mut queue: VecDeque<usize> = index
        .nodes()
        .filter(|(_, node)| node.kind() == NodeKind::Input)
        .map(|(i, _)| i)
        .collect();
    for &start in &queue {
        reached[start] = true;
    }

    while let Some(current) = queue.pop_front() {
        for &next in index.successors(current) {
            if !reached[next] {
                reached[next] = true;
                queue.push_back(next);
            }
        }
    }

    index
        .nodes()
        .filter_map(|(i, node)| {
            if node.kind() != NodeKind::Input && index.in_degree(i) == 0 {
                Some((i, OrphanReason::NoIncomingEdge))
            } else if !reached[i] {
                Some((i, OrphanReason::Unreachable))
            } else {
                None
            }
        })
        .collect()
}
