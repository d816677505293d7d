//! Reads specification text back into an editable graph.
//!
//! Two layouts are understood: the canonical one written by [`crate::serializer`]
//! (`stages` + `assertions`), and the older flat layout where model, tools and inputs
//! are top-level keys. The text carries no edges, so the rebuilt graph is always a
//! chain of pipeline stages with the assertions attached to its end.

mod layout;
mod legacy;
mod stage;

pub use layout::LayoutOptions;

use crate::error::ParseError;
use crate::graph::Graph;
use crate::spec::SpecMetadata;
use serde_yaml::{Mapping, Value};
use stage::{StageReader, describe, scalar_text};
use tracing::{debug, instrument};

/// A parsed document: the session metadata plus the rebuilt graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Decompiled {
    pub metadata: SpecMetadata,
    pub graph: Graph,
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    layout: LayoutOptions,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    #[instrument(level = "trace", skip(self, text), fields(bytes = text.len()))]
    pub fn parse(&self, text: &str) -> Result<Decompiled, ParseError> {
        let document: Value = serde_yaml::from_str(text).map_err(|e| ParseError::InvalidFormat {
            message: e.to_string(),
        })?;
        let Value::Mapping(document) = document else {
            return Err(ParseError::InvalidFormat {
                message: format!("expected a mapping at the top level, found {}", describe(&document)),
            });
        };

        let metadata = read_metadata(&document)?;
        let legacy = !document.contains_key("stages");
        let pipeline = if legacy {
            legacy::read_pipeline(&document)?
        } else {
            list(&document, "stages")?
                .iter()
                .enumerate()
                .map(|(i, entry)| stage::read_stage(&format!("stages[{i}]"), entry))
                .collect::<Result<Vec<_>, _>>()?
        };
        let assertions = list(&document, "assertions")?
            .iter()
            .enumerate()
            .map(|(i, entry)| stage::read_assertion(&format!("assertions[{i}]"), entry))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            legacy,
            stages = pipeline.len(),
            assertions = assertions.len(),
            "parsed specification"
        );
        let graph = layout::assemble(pipeline, assertions, &self.layout);
        Ok(Decompiled { metadata, graph })
    }
}

/// Parses `text` with the default layout.
pub fn parse(text: &str) -> Result<Decompiled, ParseError> {
    Parser::new().parse(text)
}

fn read_metadata(document: &Mapping) -> Result<SpecMetadata, ParseError> {
    let top = StageReader::over("document", document);
    let invalid = |e: ParseError| ParseError::InvalidFormat {
        message: e.to_string(),
    };

    let mut metadata = SpecMetadata::default();
    if let Some(name) = top.text("name").map_err(invalid)? {
        metadata.name = name;
    }
    metadata.description = top.text("description").map_err(invalid)?;
    metadata.category = top.text("category").map_err(invalid)?;
    metadata.tags = list(document, "tags")?
        .iter()
        .map(|tag| {
            scalar_text(tag).ok_or_else(|| ParseError::InvalidFormat {
                message: format!("'tags' entries must be text, found {}", describe(tag)),
            })
        })
        .collect::<Result<_, _>>()?;
    Ok(metadata)
}

/// A top-level list; absent or null reads as empty.
fn list<'d>(document: &'d Mapping, key: &str) -> Result<&'d [Value], ParseError> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Sequence(items)) => Ok(items),
        Some(other) => Err(ParseError::InvalidFormat {
            message: format!("'{key}' must be a list, found {}", describe(other)),
        }),
    }
}
