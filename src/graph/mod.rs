//! The in-memory test graph: typed nodes joined by directed edges.
//!
//! A [`Graph`] is a plain snapshot. The editing surface owns and mutates it; validation,
//! compilation and serialization only ever borrow it immutably.

mod edge;
mod index;
mod node;

pub use edge::Edge;
pub(crate) use index::GraphIndex;
pub use node::{
    AssertionPayload, AssertionValue, InputPayload, Message, ModelPayload, Node, NodeKind,
    NodePayload, Position, SystemPayload, ToolPayload,
};

use crate::error::GraphEditError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a graph from raw parts without enforcing any invariant.
    ///
    /// Used for snapshots of unknown quality (e.g. a stored canvas state); the
    /// validator reports whatever is wrong with them.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Edges whose target is `node_id`.
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target() == node_id)
    }

    /// Edges whose source is `node_id`.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source() == node_id)
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphEditError> {
        if self.contains_node(node.id()) {
            return Err(GraphEditError::DuplicateNodeId(node.id().to_string()));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Adds the edge `source -> target`.
    ///
    /// Both endpoints must exist, the edge may not loop on itself, and an ordered pair
    /// of nodes is connected at most once.
    pub fn connect(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
    ) -> Result<(), GraphEditError> {
        let id = id.into();
        for endpoint in [source, target] {
            if !self.contains_node(endpoint) {
                return Err(GraphEditError::UnknownNode(endpoint.to_string()));
            }
        }
        if source == target {
            return Err(GraphEditError::SelfLoop(source.to_string()));
        }
        if self.edge(&id).is_some() {
            return Err(GraphEditError::DuplicateEdgeId(id));
        }
        if self
            .edges
            .iter()
            .any(|e| e.source() == source && e.target() == target)
        {
            return Err(GraphEditError::DuplicateConnection {
                from_node: source.to_string(),
                to_node: target.to_string(),
            });
        }
        self.edges.push(Edge::new(id, source, target));
        Ok(())
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let position = self.nodes.iter().position(|n| n.id() == id)?;
        self.edges.retain(|e| !e.touches(id));
        Some(self.nodes.remove(position))
    }

    pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        let position = self.edges.iter().position(|e| e.id() == id)?;
        Some(self.edges.remove(position))
    }

    /// Replaces a node's payload. The replacement must keep the node's kind.
    pub fn update_payload(&mut self, id: &str, payload: NodePayload) -> Result<(), GraphEditError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or_else(|| GraphEditError::UnknownNode(id.to_string()))?;
        if node.kind() != payload.kind() {
            return Err(GraphEditError::KindChange {
                node_id: id.to_string(),
                from: node.kind(),
                to: payload.kind(),
            });
        }
        node.replace_payload(payload);
        Ok(())
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphEditError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or_else(|| GraphEditError::UnknownNode(id.to_string()))?;
        node.position = position;
        Ok(())
    }
}
