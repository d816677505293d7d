use std::fmt;

/// The fixed set of node kinds a canvas can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Input,
    Model,
    Tool,
    System,
    Assertion,
}

impl NodeKind {
    /// The lowercase name used by the canvas (`type`) and by the textual format.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Model => "model",
            NodeKind::Tool => "tool",
            NodeKind::System => "system",
            NodeKind::Assertion => "assertion",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "input" => Some(NodeKind::Input),
            "model" => Some(NodeKind::Model),
            "tool" => Some(NodeKind::Tool),
            "system" => Some(NodeKind::System),
            "assertion" => Some(NodeKind::Assertion),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas coordinates. Carried for editing fidelity only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One turn of a conversation history attached to an input.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputPayload {
    pub query: Option<String>,
    pub system_prompt: Option<String>,
    pub messages: Vec<Message>,
    pub context: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelPayload {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u64>,
    pub top_p: Option<f64>,
    pub seed: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SystemPayload {
    pub system_prompt: Option<String>,
    pub framework: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// The expected value of an assertion. Only its presence is checked here.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertionValue {
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
}

impl AssertionValue {
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            AssertionValue::Text(text) => text.trim().is_empty(),
            AssertionValue::List(items) => items.is_empty(),
            AssertionValue::Number(_) | AssertionValue::Flag(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssertionPayload {
    pub assertion_type: Option<String>,
    pub expected: Option<AssertionValue>,
}

impl AssertionPayload {
    pub fn new(assertion_type: &str, expected: AssertionValue) -> Self {
        Self {
            assertion_type: Some(assertion_type.to_string()),
            expected: Some(expected),
        }
    }
}

/// Kind-specific node attributes. The variant is the node's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Input(InputPayload),
    Model(ModelPayload),
    Tool(ToolPayload),
    System(SystemPayload),
    Assertion(AssertionPayload),
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Input(_) => NodeKind::Input,
            NodePayload::Model(_) => NodeKind::Model,
            NodePayload::Tool(_) => NodeKind::Tool,
            NodePayload::System(_) => NodeKind::System,
            NodePayload::Assertion(_) => NodeKind::Assertion,
        }
    }

    /// Names (as the canvas spells them) of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self {
            NodePayload::Input(_) | NodePayload::System(_) => {}
            NodePayload::Model(model) => {
                if is_blank(&model.model) {
                    missing.push("model");
                }
            }
            NodePayload::Tool(tool) => {
                if is_blank(&tool.name) {
                    missing.push("toolName");
                }
            }
            NodePayload::Assertion(assertion) => {
                if is_blank(&assertion.assertion_type) {
                    missing.push("assertionType");
                }
                if assertion.expected.as_ref().is_none_or(AssertionValue::is_blank) {
                    missing.push("expectedValue");
                }
            }
        }
        missing
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(|value| value.trim().is_empty())
}

/// A typed vertex of the test graph.
///
/// The id and the kind are fixed at construction; only the payload contents and the
/// position may change afterwards (see [`crate::graph::Graph::update_payload`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    payload: NodePayload,
    pub position: Position,
}

impl Node {
    pub fn new(id: impl Into<String>, payload: NodePayload, position: Position) -> Self {
        Self {
            id: id.into(),
            payload,
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    pub(crate) fn replace_payload(&mut self, payload: NodePayload) {
        self.payload = payload;
    }
}
