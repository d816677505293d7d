use super::{Edge, Graph, Node};
use ahash::{AHashMap, AHashSet};

/// Index-based view over a borrowed [`Graph`].
///
/// Nodes are stored in ascending id order, so comparing two indices is the same as
/// comparing the ids they stand for. Adjacency only holds edges whose endpoints both
/// exist; every other oddity of the snapshot is collected on the side for the validator.
pub(crate) struct GraphIndex<'g> {
    nodes: Vec<&'g Node>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    pub(crate) dangling: Vec<(&'g Edge, &'g str)>,
    pub(crate) duplicate_nodes: Vec<&'g str>,
    pub(crate) duplicate_edges: Vec<&'g Edge>,
}

impl<'g> GraphIndex<'g> {
    pub(crate) fn build(graph: &'g Graph) -> Self {
        let mut sorted: Vec<&'g Node> = graph.nodes().iter().collect();
        sorted.sort_by(|a, b| a.id().cmp(b.id()));

        let mut nodes = Vec::with_capacity(sorted.len());
        let mut lookup = AHashMap::with_capacity(sorted.len());
        let mut duplicate_nodes = Vec::new();
        for node in sorted {
            if lookup.contains_key(node.id()) {
                duplicate_nodes.push(node.id());
                continue;
            }
            lookup.insert(node.id(), nodes.len());
            nodes.push(node);
        }

        let mut successors = vec![Vec::new(); nodes.len()];
        let mut predecessors = vec![Vec::new(); nodes.len()];
        let mut dangling = Vec::new();
        let mut duplicate_edges = Vec::new();
        let mut seen_pairs = AHashSet::new();
        let mut seen_ids = AHashSet::new();

        for edge in graph.edges() {
            let reused_id = !seen_ids.insert(edge.id());
            let source = lookup.get(edge.source()).copied();
            let target = lookup.get(edge.target()).copied();
            if source.is_none() {
                dangling.push((edge, edge.source()));
            }
            if target.is_none() {
                dangling.push((edge, edge.target()));
            }
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            if !seen_pairs.insert((source, target)) {
                duplicate_edges.push(edge);
                continue;
            }
            if reused_id {
                duplicate_edges.push(edge);
            }
            successors[source].push(target);
            predecessors[target].push(source);
        }
        for list in successors.iter_mut().chain(predecessors.iter_mut()) {
            list.sort_unstable();
        }

        Self {
            nodes,
            successors,
            predecessors,
            dangling,
            duplicate_nodes,
            duplicate_edges,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, index: usize) -> &'g Node {
        self.nodes[index]
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = (usize, &'g Node)> + '_ {
        self.nodes.iter().copied().enumerate()
    }

    pub(crate) fn successors(&self, index: usize) -> &[usize] {
        &self.successors[index]
    }

    pub(crate) fn in_degree(&self, index: usize) -> usize {
        self.predecessors[index].len()
    }

    pub(crate) fn id(&self, index: usize) -> &'g str {
        self.nodes[index].id()
    }
}
