//! Conversion between the editing canvas's JSON snapshot and [`Graph`].
//!
//! The raw types mirror what the canvas stores per node: a `type` string, a flat
//! `data` object in the canvas's own field names, and a position. Unknown fields
//! (labels, selection state, handles) are ignored on the way in.

use crate::error::CanvasConversionError;
use crate::graph::{
    AssertionPayload, AssertionValue, Edge, Graph, InputPayload, Message, ModelPayload, Node,
    NodeKind, NodePayload, Position, SystemPayload, ToolPayload,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A trait for snapshots that can be turned into a [`Graph`].
///
/// The conversion is purely structural; no graph invariant is checked here. Run the
/// result through [`crate::validator::validate`] to find dangling edges, cycles and
/// the like.
pub trait IntoGraph {
    fn into_graph(self) -> Result<Graph, CanvasConversionError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub position: RawPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Complete canvas snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCanvas {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Values an assertion node may hold in `assertionValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAssertionValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// The flat `data` object of a canvas node. Which fields matter depends on the node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNodeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<RawMessage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(alias = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(alias = "topP", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    #[serde(rename = "toolName", alias = "tool_name", skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(rename = "toolDescription", alias = "tool_description", skip_serializing_if = "Option::is_none")]
    pub tool_description: Option<String>,
    #[serde(rename = "toolParameters", alias = "tool_parameters", skip_serializing_if = "Option::is_none")]
    pub tool_parameters: Option<Map<String, Value>>,

    /// System nodes spell their prompt in camelCase, input nodes do not.
    #[serde(rename = "systemPrompt", skip_serializing_if = "Option::is_none")]
    pub config_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(alias = "timeoutMs", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[serde(rename = "assertionType", alias = "assertion_type", skip_serializing_if = "Option::is_none")]
    pub assertion_type: Option<String>,
    #[serde(rename = "assertionValue", alias = "expectedValue", skip_serializing_if = "Option::is_none")]
    pub assertion_value: Option<RawAssertionValue>,
}

impl RawCanvas {
    pub fn from_json(json: &str) -> Result<Self, CanvasConversionError> {
        serde_json::from_str(json).map_err(|e| CanvasConversionError::JsonParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CanvasConversionError> {
        serde_json::to_string_pretty(self).map_err(|e| CanvasConversionError::JsonParseError(e.to_string()))
    }

    /// Builds the snapshot handed back to the canvas, with a generated label per node.
    pub fn from_graph(graph: &Graph) -> Result<Self, CanvasConversionError> {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| {
                let data = serde_json::to_value(node_data(node.payload())).map_err(|e| {
                    CanvasConversionError::InvalidNodeData {
                        node_id: node.id().to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(RawNode {
                    id: node.id().to_string(),
                    node_type: node.kind().as_str().to_string(),
                    data,
                    position: RawPosition {
                        x: node.position.x,
                        y: node.position.y,
                    },
                })
            })
            .collect::<Result<Vec<_>, CanvasConversionError>>()?;
        let edges = graph
            .edges()
            .iter()
            .map(|edge| RawEdge {
                id: edge.id().to_string(),
                source: edge.source().to_string(),
                target: edge.target().to_string(),
            })
            .collect();
        Ok(Self { nodes, edges })
    }
}

impl IntoGraph for RawCanvas {
    fn into_graph(self) -> Result<Graph, CanvasConversionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|raw| {
                let kind = NodeKind::from_name(&raw.node_type).ok_or_else(|| {
                    CanvasConversionError::UnknownNodeType {
                        node_id: raw.id.clone(),
                        type_name: raw.node_type.clone(),
                    }
                })?;
                let data: RawNodeData = match raw.data {
                    Value::Null => RawNodeData::default(),
                    data => serde_json::from_value(data).map_err(|e| {
                        CanvasConversionError::InvalidNodeData {
                            node_id: raw.id.clone(),
                            message: e.to_string(),
                        }
                    })?,
                };
                let position = Position::new(raw.position.x, raw.position.y);
                Ok(Node::new(raw.id, payload(kind, data), position))
            })
            .collect::<Result<Vec<_>, CanvasConversionError>>()?;

        let edges = self
            .edges
            .into_iter()
            .map(|raw| {
                let id = if raw.id.is_empty() {
                    format!("e-{}-{}", raw.source, raw.target)
                } else {
                    raw.id
                };
                Edge::new(id, raw.source, raw.target)
            })
            .collect();

        Ok(Graph::from_parts(nodes, edges))
    }
}

fn payload(kind: NodeKind, data: RawNodeData) -> NodePayload {
    match kind {
        NodeKind::Input => NodePayload::Input(InputPayload {
            query: data.query,
            system_prompt: data.system_prompt.or(data.config_prompt),
            messages: data
                .messages
                .unwrap_or_default()
                .into_iter()
                .map(|m| Message {
                    role: m.role,
                    content: m.content,
                })
                .collect(),
            context: data.context,
        }),
        NodeKind::Model => NodePayload::Model(ModelPayload {
            provider: data.provider,
            model: data.model,
            temperature: data.temperature,
            max_tokens: data.max_tokens,
            top_p: data.top_p,
            seed: data.seed,
        }),
        NodeKind::Tool => NodePayload::Tool(ToolPayload {
            name: data.tool_name,
            description: data.tool_description,
            parameters: data.tool_parameters,
        }),
        NodeKind::System => NodePayload::System(SystemPayload {
            system_prompt: data.config_prompt.or(data.system_prompt),
            framework: data.framework,
            timeout_ms: data.timeout_ms,
        }),
        NodeKind::Assertion => NodePayload::Assertion(AssertionPayload {
            expected: data
                .assertion_value
                .map(|value| assertion_value(data.assertion_type.as_deref(), value)),
            assertion_type: data.assertion_type,
        }),
    }
}

/// Assertions that compare against a number.
const NUMERIC_ASSERTIONS: &[&str] = &["max_latency_ms", "min_tokens", "max_tokens"];

/// The canvas edits every assertion value as text; numeric assertions get their
/// number back here. Text that is not a finite number is kept as it is.
fn assertion_value(assertion_type: Option<&str>, value: RawAssertionValue) -> AssertionValue {
    let numeric = assertion_type.is_some_and(|kind| NUMERIC_ASSERTIONS.contains(&kind));
    match value {
        RawAssertionValue::Text(text) if numeric => match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => AssertionValue::Number(number),
            _ => AssertionValue::Text(text),
        },
        RawAssertionValue::Text(text) => AssertionValue::Text(text),
        RawAssertionValue::Flag(flag) => AssertionValue::Flag(flag),
        RawAssertionValue::Number(number) => AssertionValue::Number(number),
        RawAssertionValue::List(items) => AssertionValue::List(items),
    }
}

fn node_data(payload: &NodePayload) -> RawNodeData {
    match payload {
        NodePayload::Input(input) => RawNodeData {
            label: Some("Input".to_string()),
            query: input.query.clone(),
            system_prompt: input.system_prompt.clone(),
            messages: (!input.messages.is_empty()).then(|| {
                input
                    .messages
                    .iter()
                    .map(|m| RawMessage {
                        role: m.role.clone(),
                        content: m.content.clone(),
                    })
                    .collect()
            }),
            context: input.context.clone(),
            ..RawNodeData::default()
        },
        NodePayload::Model(model) => RawNodeData {
            label: Some(match &model.model {
                Some(name) => format!("Model: {name}"),
                None => "Model".to_string(),
            }),
            provider: model.provider.clone(),
            model: model.model.clone(),
            temperature: model.temperature,
            max_tokens: model.max_tokens,
            top_p: model.top_p,
            seed: model.seed,
            ..RawNodeData::default()
        },
        NodePayload::Tool(tool) => RawNodeData {
            label: Some(match &tool.name {
                Some(name) => format!("Tool: {name}"),
                None => "Tool".to_string(),
            }),
            tool_name: tool.name.clone(),
            tool_description: tool.description.clone(),
            tool_parameters: tool.parameters.clone(),
            ..RawNodeData::default()
        },
        NodePayload::System(system) => RawNodeData {
            label: Some("System Config".to_string()),
            config_prompt: system.system_prompt.clone(),
            framework: system.framework.clone(),
            timeout_ms: system.timeout_ms,
            ..RawNodeData::default()
        },
        NodePayload::Assertion(assertion) => RawNodeData {
            label: Some(match &assertion.assertion_type {
                Some(kind) => format!("Assertion: {kind}"),
                None => "Assertion".to_string(),
            }),
            assertion_type: assertion.assertion_type.clone(),
            assertion_value: assertion.expected.as_ref().map(|value| match value {
                AssertionValue::Flag(flag) => RawAssertionValue::Flag(*flag),
                AssertionValue::Number(number) => RawAssertionValue::Number(*number),
                AssertionValue::Text(text) => RawAssertionValue::Text(text.clone()),
                AssertionValue::List(items) => RawAssertionValue::List(items.clone()),
            }),
            ..RawNodeData::default()
        },
    }
}
