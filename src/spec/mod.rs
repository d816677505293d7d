//! The compiled test specification.

use crate::graph::{AssertionPayload, NodeKind, NodePayload};

/// Descriptive data supplied by the editing session rather than by the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecMetadata {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl SpecMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for SpecMetadata {
    fn default() -> Self {
        Self {
            name: "Test from Canvas".to_string(),
            description: None,
            category: None,
            tags: Vec::new(),
        }
    }
}

/// One pipeline step, produced from exactly one graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    node_id: String,
    payload: NodePayload,
}

impl Stage {
    pub fn new(node_id: impl Into<String>, payload: NodePayload) -> Self {
        Self {
            node_id: node_id.into(),
            payload,
        }
    }

    /// Id of the node this stage was compiled from.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }
}

/// An ordered, immutable sequence of stages plus metadata.
///
/// The stage order is a topological order of the graph it was compiled from.
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    metadata: SpecMetadata,
    stages: Vec<Stage>,
}

impl Specification {
    pub fn new(metadata: SpecMetadata, stages: Vec<Stage>) -> Self {
        Self { metadata, stages }
    }

    pub fn metadata(&self) -> &SpecMetadata {
        &self.metadata
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Index of the stage compiled from `node_id`.
    pub fn position_of(&self, node_id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.node_id == node_id)
    }

    /// Input, model, tool and system stages, in stage order.
    pub fn pipeline(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter().filter(|s| s.kind() != NodeKind::Assertion)
    }

    /// Assertion stages, in stage order.
    pub fn assertions(&self) -> impl Iterator<Item = &AssertionPayload> {
        self.stages.iter().filter_map(|s| match &s.payload {
            NodePayload::Assertion(assertion) => Some(assertion),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
