use crate::graph::{AssertionPayload, Edge, Graph, Node, NodePayload, Position};

/// Where decompiled nodes are placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub origin_x: f64,
    pub origin_y: f64,
    /// Vertical distance between consecutive stages.
    pub spacing: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            origin_x: 250.0,
            origin_y: 100.0,
            spacing: 180.0,
        }
    }
}

impl LayoutOptions {
    fn position(&self, index: usize) -> Position {
        Position::new(self.origin_x, self.origin_y + self.spacing * index as f64)
    }
}

/// Rebuilds a graph from stages in textual order.
///
/// Pipeline stages form a chain; every assertion hangs off the last pipeline stage.
/// Ids are `<kind>-<n>` with `n` zero-padded, so ascending id order among nodes that
/// become ready together is textual order.
pub(super) fn assemble(
    pipeline: Vec<NodePayload>,
    assertions: Vec<AssertionPayload>,
    layout: &LayoutOptions,
) -> Graph {
    let total = pipeline.len() + assertions.len();
    let width = total.to_string().len();

    let payloads = pipeline
        .into_iter()
        .chain(assertions.into_iter().map(NodePayload::Assertion));
    let mut nodes = Vec::with_capacity(total);
    let mut edges = Vec::with_capacity(total.saturating_sub(1));
    let mut last_pipeline: Option<String> = None;

    for (index, payload) in payloads.enumerate() {
        let id = format!("{}-{:0width$}", payload.kind(), index + 1);
        if let Some(previous) = &last_pipeline {
            edges.push(Edge::new(format!("e-{previous}-{id}"), previous.clone(), id.clone()));
        }
        if !matches!(payload, NodePayload::Assertion(_)) {
            last_pipeline = Some(id.clone());
        }
        nodes.push(Node::new(id, payload, layout.position(index)));
    }

    Graph::from_parts(nodes, edges)
}
