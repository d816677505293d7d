//! The flat, hand-written layout: one top-level key per concern instead of a
//! `stages` list.
//!
//! ```yaml
//! name: Browser agent
//! model: claude-3-5-sonnet
//! provider: anthropic
//! seed: 42
//! model_config: { temperature: 0.2, max_tokens: 512 }
//! tools: [browser, { name: calculator, description: Adds numbers }]
//! inputs: { query: Find laptops under $1000 }
//! framework: langgraph
//! assertions:
//!   - must_call_tool: browser
//! ```

use super::stage::{StageReader, describe};
use crate::error::ParseError;
use crate::graph::{ModelPayload, NodePayload, SystemPayload, ToolPayload};
use serde_yaml::{Mapping, Value};

const MODEL_KEYS: &[&str] = &["model", "provider", "seed", "model_config"];
const SYSTEM_KEYS: &[&str] = &["system_prompt", "framework", "timeout_ms"];

/// Pipeline stages in the fixed order input, model, tools, system.
pub(super) fn read_pipeline(document: &Mapping) -> Result<Vec<NodePayload>, ParseError> {
    let top = StageReader::over("document", document);
    let mut pipeline = Vec::new();

    if let Some(inputs) = document.get("inputs").filter(|v| !v.is_null()) {
        let reader = StageReader::new("inputs", inputs)?;
        pipeline.push(NodePayload::Input(reader.input()?));
    }

    if MODEL_KEYS.iter().any(|key| top.has(key)) {
        pipeline.push(NodePayload::Model(read_model(&top, document)?));
    }

    if let Some(tools) = document.get("tools").filter(|v| !v.is_null()) {
        let Value::Sequence(tools) = tools else {
            return Err(ParseError::InvalidFormat {
                message: format!("'tools' must be a list, found {}", describe(tools)),
            });
        };
        for (i, tool) in tools.iter().enumerate() {
            pipeline.push(NodePayload::Tool(read_tool(&format!("tools[{i}]"), tool)?));
        }
    }

    if SYSTEM_KEYS.iter().any(|key| top.has(key)) {
        pipeline.push(NodePayload::System(SystemPayload {
            system_prompt: top.text("system_prompt")?,
            framework: top.text("framework")?,
            timeout_ms: top.unsigned("timeout_ms")?,
        }));
    }

    Ok(pipeline)
}

fn read_model(top: &StageReader<'_>, document: &Mapping) -> Result<ModelPayload, ParseError> {
    let mut model = ModelPayload {
        provider: top.text("provider")?,
        model: Some(top.required_text("model")?),
        seed: top.integer("seed")?,
        ..ModelPayload::default()
    };
    if let Some(config) = document.get("model_config").filter(|v| !v.is_null()) {
        let config = StageReader::new("model_config", config)?;
        model.temperature = config.float("temperature")?;
        model.max_tokens = config.unsigned("max_tokens")?;
        model.top_p = config.float("top_p")?;
    }
    Ok(model)
}

fn read_tool(stage: &str, tool: &Value) -> Result<ToolPayload, ParseError> {
    match tool {
        Value::String(name) if !name.trim().is_empty() => Ok(ToolPayload {
            name: Some(name.clone()),
            ..ToolPayload::default()
        }),
        _ => StageReader::new(stage, tool)?.tool(),
    }
}
