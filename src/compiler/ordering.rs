use crate::error::CompileError;
use crate::graph::GraphIndex;
use std::collections::BTreeSet;

/// Kahn's algorithm over the index arena.
///
/// Ready nodes live in an ordered set; since indices follow ascending id order, the
/// smallest ready index is always the smallest ready id.
pub(super) fn topological_order(index: &GraphIndex<'_>) -> Result<Vec<usize>, CompileError> {
    let mut in_degree: Vec<usize> = (0..index.len()).map(|i| index.in_degree(i)).collect();
    let mut ready: BTreeSet<usize> = (0..index.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(index.len());

    while let Some(current) = ready.pop_first() {
        order.push(current);
        for &next in index.successors(current) {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() != index.len() {
        let remaining = (0..index.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| index.id(i).to_string())
            .collect();
        return Err(CompileError::Unordered { remaining });
    }
    Ok(order)
}
