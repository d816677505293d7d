use crate::error::ParseError;
use crate::graph::{
    AssertionPayload, AssertionValue, InputPayload, Message, ModelPayload, NodeKind, NodePayload,
    SystemPayload, ToolPayload,
};
use serde_yaml::{Mapping, Value};

/// Typed access to the fields of one stage body.
///
/// Absent and null fields read as `None`; a present field of the wrong shape is a
/// [`ParseError::MalformedStage`] naming this stage.
pub(super) struct StageReader<'a> {
    stage: String,
    body: Option<&'a Mapping>,
}

impl<'a> StageReader<'a> {
    pub(super) fn new(stage: impl Into<String>, body: &'a Value) -> Result<Self, ParseError> {
        let stage = stage.into();
        match body {
            Value::Mapping(mapping) => Ok(Self {
                stage,
                body: Some(mapping),
            }),
            Value::Null => Ok(Self { stage, body: None }),
            other => Err(malformed(&stage, "body", format!("expected a mapping, found {}", describe(other)))),
        }
    }

    /// Reads a body that is the top-level document itself.
    pub(super) fn over(stage: impl Into<String>, body: &'a Mapping) -> Self {
        Self {
            stage: stage.into(),
            body: Some(body),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.body
            .and_then(|body| body.get(field))
            .filter(|value| !value.is_null())
    }

    pub(super) fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub(super) fn error(&self, field: &str, reason: impl Into<String>) -> ParseError {
        malformed(&self.stage, field, reason.into())
    }

    /// Numbers and booleans are read as their text, so `model: 4` names model "4".
    pub(super) fn text(&self, field: &str) -> Result<Option<String>, ParseError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => scalar_text(value)
                .map(Some)
                .ok_or_else(|| self.error(field, format!("expected text, found {}", describe(value)))),
        }
    }

    pub(super) fn required_text(&self, field: &str) -> Result<String, ParseError> {
        match self.text(field)? {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(self.error(field, "required field is missing")),
        }
    }

    pub(super) fn float(&self, field: &str) -> Result<Option<f64>, ParseError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.error(field, format!("expected a number, found {}", describe(value)))),
        }
    }

    pub(super) fn unsigned(&self, field: &str) -> Result<Option<u64>, ParseError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                self.error(field, format!("expected a non-negative integer, found {}", describe(value)))
            }),
        }
    }

    pub(super) fn integer(&self, field: &str) -> Result<Option<i64>, ParseError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.error(field, format!("expected an integer, found {}", describe(value)))),
        }
    }

    pub(super) fn object(
        &self,
        field: &str,
    ) -> Result<Option<serde_json::Map<String, serde_json::Value>>, ParseError> {
        match self.get(field) {
            None => Ok(None),
            Some(value @ Value::Mapping(_)) => match serde_json::to_value(value) {
                Ok(serde_json::Value::Object(object)) => Ok(Some(object)),
                Ok(_) => Err(self.error(field, "expected a mapping")),
                Err(e) => Err(self.error(field, e.to_string())),
            },
            Some(other) => Err(self.error(field, format!("expected a mapping, found {}", describe(other)))),
        }
    }

    pub(super) fn messages(&self, field: &str) -> Result<Vec<Message>, ParseError> {
        let Some(value) = self.get(field) else {
            return Ok(Vec::new());
        };
        let Value::Sequence(items) = value else {
            return Err(self.error(field, format!("expected a list, found {}", describe(value))));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let entry = StageReader::new(format!("{}.{field}[{i}]", self.stage), item)?;
                Ok(Message {
                    role: entry.required_text("role")?,
                    content: entry.text("content")?.unwrap_or_default(),
                })
            })
            .collect()
    }

    pub(super) fn input(&self) -> Result<InputPayload, ParseError> {
        Ok(InputPayload {
            query: self.text("query")?,
            system_prompt: self.text("system_prompt")?,
            messages: self.messages("messages")?,
            context: self.object("context")?,
        })
    }

    pub(super) fn model(&self) -> Result<ModelPayload, ParseError> {
        Ok(ModelPayload {
            provider: self.text("provider")?,
            model: Some(self.required_text("model")?),
            temperature: self.float("temperature")?,
            max_tokens: self.unsigned("max_tokens")?,
            top_p: self.float("top_p")?,
            seed: self.integer("seed")?,
        })
    }

    pub(super) fn tool(&self) -> Result<ToolPayload, ParseError> {
        Ok(ToolPayload {
            name: Some(self.required_text("name")?),
            description: self.text("description")?,
            parameters: self.object("parameters")?,
        })
    }

    pub(super) fn system(&self) -> Result<SystemPayload, ParseError> {
        Ok(SystemPayload {
            system_prompt: self.text("system_prompt")?,
            framework: self.text("framework")?,
            timeout_ms: self.unsigned("timeout_ms")?,
        })
    }
}

/// Reads a `{kind: body}` entry of the `stages` list.
pub(super) fn read_stage(stage: &str, entry: &Value) -> Result<NodePayload, ParseError> {
    let (kind_name, body) = single_entry(stage, entry)?;
    let reader = || StageReader::new(stage, body);
    match NodeKind::from_name(&kind_name) {
        Some(NodeKind::Input) => Ok(NodePayload::Input(reader()?.input()?)),
        Some(NodeKind::Model) => Ok(NodePayload::Model(reader()?.model()?)),
        Some(NodeKind::Tool) => Ok(NodePayload::Tool(reader()?.tool()?)),
        Some(NodeKind::System) => Ok(NodePayload::System(reader()?.system()?)),
        Some(NodeKind::Assertion) => Err(malformed(
            stage,
            &kind_name,
            "assertions belong in the assertions list".to_string(),
        )),
        None => Err(malformed(stage, &kind_name, "unknown stage kind".to_string())),
    }
}

/// Reads a `{assertion_type: expected}` entry of the `assertions` list.
pub(super) fn read_assertion(stage: &str, entry: &Value) -> Result<AssertionPayload, ParseError> {
    let (assertion_type, value) = single_entry(stage, entry)?;
    if assertion_type.trim().is_empty() {
        return Err(malformed(stage, "type", "assertion type is empty".to_string()));
    }
    let expected = match value {
        Value::String(text) => AssertionValue::Text(text.clone()),
        Value::Bool(flag) => AssertionValue::Flag(*flag),
        Value::Number(number) => match number.as_f64() {
            Some(number) => AssertionValue::Number(number),
            None => return Err(malformed(stage, &assertion_type, "number out of range".to_string())),
        },
        Value::Sequence(items) => AssertionValue::List(
            items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| {
                        malformed(stage, &assertion_type, format!("list items must be scalars, found {}", describe(item)))
                    })
                })
                .collect::<Result<_, _>>()?,
        ),
        Value::Null => {
            return Err(malformed(stage, &assertion_type, "expected value is missing".to_string()));
        }
        other => {
            return Err(malformed(
                stage,
                &assertion_type,
                format!("expected a scalar or a list, found {}", describe(other)),
            ));
        }
    };
    if expected.is_blank() {
        return Err(malformed(stage, &assertion_type, "expected value is blank".to_string()));
    }
    Ok(AssertionPayload {
        assertion_type: Some(assertion_type),
        expected: Some(expected),
    })
}

fn single_entry<'v>(stage: &str, entry: &'v Value) -> Result<(String, &'v Value), ParseError> {
    let Value::Mapping(mapping) = entry else {
        return Err(malformed(stage, "entry", format!("expected a one-key mapping, found {}", describe(entry))));
    };
    let mut entries = mapping.iter();
    match (entries.next(), entries.next()) {
        (Some((key, value)), None) => {
            let key = scalar_text(key)
                .ok_or_else(|| malformed(stage, "entry", "key must be a scalar".to_string()))?;
            Ok((key, value))
        }
        _ => Err(malformed(
            stage,
            "entry",
            format!("expected exactly one key, found {}", mapping.len()),
        )),
    }
}

pub(super) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(super) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn malformed(stage: &str, field: &str, reason: String) -> ParseError {
    ParseError::MalformedStage {
        stage: stage.to_string(),
        field: field.to_string(),
        reason,
    }
}
