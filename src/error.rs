use crate::graph::NodeKind;
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// Why a node counts as an orphan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanReason {
    /// A non-input node without any incoming edge.
    NoIncomingEdge,
    /// The node has incoming edges, but no path leads to it from an input node.
    Unreachable,
}

impl fmt::Display for OrphanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrphanReason::NoIncomingEdge => f.write_str("it has no incoming edge"),
            OrphanReason::Unreachable => f.write_str("no input node reaches it"),
        }
    }
}

/// Structural problems found by the validator. Every variant blocks compilation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Cycle detected through nodes [{}]", node_ids.iter().join(" -> "))]
    CycleDetected { node_ids: Vec<String> },

    #[error("Node '{node_id}' is orphaned: {reason}")]
    OrphanNode {
        node_id: String,
        reason: OrphanReason,
    },

    #[error("Node '{node_id}' is missing required field '{field}'")]
    IncompletePayload { node_id: String, field: String },

    #[error("Edge '{edge_id}' references node '{missing_node_id}', which does not exist")]
    DanglingEdge {
        edge_id: String,
        missing_node_id: String,
    },

    #[error("Node id '{node_id}' is used by more than one node")]
    DuplicateNodeId { node_id: String },

    #[error("Edge '{edge_id}' ('{from_node}' -> '{to_node}') duplicates an existing edge")]
    DuplicateEdge {
        edge_id: String,
        from_node: String,
        to_node: String,
    },
}

impl GraphError {
    /// Node ids the editing surface should highlight for this error.
    pub fn node_ids(&self) -> Vec<&str> {
        match self {
            GraphError::CycleDetected { node_ids } => node_ids.iter().map(String::as_str).collect(),
            GraphError::OrphanNode { node_id, .. }
            | GraphError::IncompletePayload { node_id, .. }
            | GraphError::DuplicateNodeId { node_id } => vec![node_id.as_str()],
            GraphError::DanglingEdge { .. } | GraphError::DuplicateEdge { .. } => Vec::new(),
        }
    }

    /// The edge id the editing surface should highlight, if any.
    pub fn edge_id(&self) -> Option<&str> {
        match self {
            GraphError::DanglingEdge { edge_id, .. } | GraphError::DuplicateEdge { edge_id, .. } => {
                Some(edge_id)
            }
            _ => None,
        }
    }
}

/// Non-fatal findings. Compilation proceeds when only warnings are present.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphWarning {
    #[error("The graph has no assertion nodes; the specification will not check anything")]
    NoAssertions,
}

/// Errors that can occur during the compilation phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Graph is invalid ({} problem(s)): {}", errors.len(), errors.iter().join("; "))]
    InvalidGraph { errors: Vec<GraphError> },

    #[error("Could not order nodes [{}]; the graph changed shape after validation", remaining.iter().join(", "))]
    Unordered { remaining: Vec<String> },
}

impl CompileError {
    /// The validation errors behind a refused compilation.
    pub fn graph_errors(&self) -> &[GraphError] {
        match self {
            CompileError::InvalidGraph { errors } => errors,
            CompileError::Unordered { .. } => &[],
        }
    }
}

/// Errors produced while reading specification text back into a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Stage {stage} is malformed at '{field}': {reason}")]
    MalformedStage {
        stage: String,
        field: String,
        reason: String,
    },

    #[error("Invalid specification document: {message}")]
    InvalidFormat { message: String },
}

/// Errors returned by the graph editing helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphEditError {
    #[error("A node with id '{0}' already exists")]
    DuplicateNodeId(String),

    #[error("An edge with id '{0}' already exists")]
    DuplicateEdgeId(String),

    #[error("Node '{0}' not found")]
    UnknownNode(String),

    #[error("Node '{0}' cannot be connected to itself")]
    SelfLoop(String),

    #[error("Nodes '{from_node}' and '{to_node}' are already connected")]
    DuplicateConnection { from_node: String, to_node: String },

    #[error("Node '{node_id}' is a {from} node and cannot take a {to} payload")]
    KindChange {
        node_id: String,
        from: NodeKind,
        to: NodeKind,
    },
}

/// Errors that can occur when converting a canvas snapshot into a [`crate::graph::Graph`].
#[derive(Error, Debug, Clone)]
pub enum CanvasConversionError {
    #[error("Failed to parse canvas JSON: {0}")]
    JsonParseError(String),

    #[error("Node '{node_id}' has an unknown type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' carries invalid data: {message}")]
    InvalidNodeData { node_id: String, message: String },
}
