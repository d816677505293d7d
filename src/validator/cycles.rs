use crate::graph::GraphIndex;
use ahash::AHashSet;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Finds cycles with a depth-first walk that tracks the current recursion stack.
///
/// Roots and successors are visited in ascending id order. Every back edge yields the
/// slice of the stack it closes; cycles over the same node set are reported once.
pub(super) fn find_cycles(index: &GraphIndex<'_>) -> Vec<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; index.len()];
    let mut cycles = Vec::new();
    let mut seen: AHashSet<Vec<usize>> = AHashSet::new();

    for root in 0..index.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        // (node, position of the next successor to look at)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        marks[root] = Mark::OnStack;

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let successors = index.successors(node);
            if cursor == successors.len() {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let next = successors[cursor];
            match marks[next] {
                Mark::Unvisited => {
                    marks[next] = Mark::OnStack;
                    stack.push((next, 0));
                }
                Mark::OnStack => {
                    let start = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                    let cycle: Vec<usize> = stack[start..].iter().map(|(n, _)| *n).collect();
                    let mut key = cycle.clone();
                    key.sort_unstable();
                    if seen.insert(key) {
                        cycles.push(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
    }
    cycles
}
