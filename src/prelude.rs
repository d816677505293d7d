//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions of the crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use sentinel_canvas::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let canvas_json = std::fs::read_to_string("path/to/canvas.json")?;
//! let graph = RawCanvas::from_json(&canvas_json)?.into_graph()?;
//!
//! let report = validate(&graph);
//! for error in &report.errors {
//!     eprintln!("{error}");
//! }
//!
//! let spec = compile(&graph, SpecMetadata::default())?;
//! println!("{}", serialize(&spec));
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    AssertionPayload, AssertionValue, Edge, Graph, InputPayload, Message, ModelPayload, Node,
    NodeKind, NodePayload, Position, SystemPayload, ToolPayload,
};

// Canvas snapshot
pub use crate::canvas::{IntoGraph, RawCanvas};

// Pipeline
pub use crate::compiler::{CompilationArtifacts, Compiler, compile};
pub use crate::parser::{Decompiled, LayoutOptions, Parser, parse};
pub use crate::preview::{PreviewBoard, PreviewOutput, render_preview};
pub use crate::serializer::serialize;
pub use crate::spec::{SpecMetadata, Specification, Stage};
pub use crate::validator::{ValidationReport, Validator, validate};

// Error types
pub use crate::error::{
    CanvasConversionError, CompileError, GraphEditError, GraphError, GraphWarning, OrphanReason,
    ParseError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
