//! Canonical text form of a [`Specification`].
//!
//! The output is a block-style YAML subset with a fixed key order, so equal
//! specifications always produce byte-identical text. Stage node ids are not written.

mod writer;

use crate::graph::{
    AssertionPayload, AssertionValue, InputPayload, ModelPayload, NodePayload, SystemPayload,
    ToolPayload,
};
use crate::spec::{SpecMetadata, Specification};
use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::instrument;
use writer::Block;

/// Renders `spec` as canonical text.
#[instrument(level = "trace", skip(spec), fields(name = %spec.metadata().name, stages = spec.len()))]
pub fn serialize(spec: &Specification) -> String {
    let mut entries = metadata_entries(spec.metadata());

    let stages = spec
        .pipeline()
        .filter_map(|stage| {
            let (kind, body) = match stage.payload() {
                NodePayload::Input(input) => ("input", input_body(input)),
                NodePayload::Model(model) => ("model", model_body(model)),
                NodePayload::Tool(tool) => ("tool", tool_body(tool)),
                NodePayload::System(system) => ("system", system_body(system)),
                NodePayload::Assertion(_) => return None,
            };
            Some(Block::Map(vec![(kind.to_string(), Block::Map(body))]))
        })
        .collect();
    entries.push(("stages".to_string(), Block::Seq(stages)));

    let assertions = spec.assertions().map(assertion_entry).collect();
    entries.push(("assertions".to_string(), Block::Seq(assertions)));

    writer::render(&entries)
}

fn metadata_entries(metadata: &SpecMetadata) -> Vec<(String, Block)> {
    let mut entries = vec![("name".to_string(), Block::text(&metadata.name))];
    push_text(&mut entries, "description", &metadata.description);
    push_text(&mut entries, "category", &metadata.category);
    if !metadata.tags.is_empty() {
        let tags = metadata.tags.iter().map(|t| Block::text(t)).collect();
        entries.push(("tags".to_string(), Block::Seq(tags)));
    }
    entries
}

fn input_body(input: &InputPayload) -> Vec<(String, Block)> {
    let mut body = Vec::new();
    push_text(&mut body, "query", &input.query);
    push_text(&mut body, "system_prompt", &input.system_prompt);
    if !input.messages.is_empty() {
        let messages = input
            .messages
            .iter()
            .map(|m| {
                Block::Map(vec![
                    ("role".to_string(), Block::text(&m.role)),
                    ("content".to_string(), Block::text(&m.content)),
                ])
            })
            .collect();
        body.push(("messages".to_string(), Block::Seq(messages)));
    }
    if let Some(context) = &input.context {
        body.push(("context".to_string(), json_object(context)));
    }
    body
}

fn model_body(model: &ModelPayload) -> Vec<(String, Block)> {
    let mut body = Vec::new();
    push_text(&mut body, "provider", &model.provider);
    push_text(&mut body, "model", &model.model);
    if let Some(temperature) = model.temperature {
        body.push(("temperature".to_string(), Block::Scalar(writer::float(temperature))));
    }
    push_number(&mut body, "max_tokens", model.max_tokens);
    if let Some(top_p) = model.top_p {
        body.push(("top_p".to_string(), Block::Scalar(writer::float(top_p))));
    }
    push_number(&mut body, "seed", model.seed);
    body
}

fn tool_body(tool: &ToolPayload) -> Vec<(String, Block)> {
    let mut body = Vec::new();
    push_text(&mut body, "name", &tool.name);
    push_text(&mut body, "description", &tool.description);
    if let Some(parameters) = &tool.parameters {
        body.push(("parameters".to_string(), json_object(parameters)));
    }
    body
}

fn system_body(system: &SystemPayload) -> Vec<(String, Block)> {
    let mut body = Vec::new();
    push_text(&mut body, "system_prompt", &system.system_prompt);
    push_text(&mut body, "framework", &system.framework);
    push_number(&mut body, "timeout_ms", system.timeout_ms);
    body
}

fn assertion_entry(assertion: &AssertionPayload) -> Block {
    let key = assertion.assertion_type.clone().unwrap_or_default();
    let value = match &assertion.expected {
        Some(AssertionValue::Text(text)) => Block::text(text),
        Some(AssertionValue::Number(number)) => Block::Scalar(writer::float(*number)),
        Some(AssertionValue::Flag(flag)) => Block::Scalar(flag.to_string()),
        Some(AssertionValue::List(items)) => {
            Block::Seq(items.iter().map(|i| Block::text(i)).collect())
        }
        None => Block::Scalar("null".to_string()),
    };
    Block::Map(vec![(key, value)])
}

fn push_text(entries: &mut Vec<(String, Block)>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        entries.push((key.to_string(), Block::text(value)));
    }
}

fn push_number<N: ToString>(entries: &mut Vec<(String, Block)>, key: &str, value: Option<N>) {
    if let Some(value) = value {
        entries.push((key.to_string(), Block::Scalar(value.to_string())));
    }
}

fn json_object(object: &Map<String, Value>) -> Block {
    let entries = object
        .iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
        .map(|(key, value)| (key.clone(), json_value(value)))
        .collect();
    Block::Map(entries)
}

fn json_value(value: &Value) -> Block {
    match value {
        Value::Null => Block::Scalar("null".to_string()),
        Value::Bool(flag) => Block::Scalar(flag.to_string()),
        Value::Number(number) => match number.as_f64() {
            Some(float) if !number.is_i64() && !number.is_u64() => {
                Block::Scalar(writer::float(float))
            }
            _ => Block::Scalar(number.to_string()),
        },
        Value::String(text) => Block::text(text),
        Value::Array(items) => Block::Seq(items.iter().map(json_value).collect()),
        Value::Object(object) => json_object(object),
    }
}
