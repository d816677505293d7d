//! # Sentinel Canvas - Graph to Test Specification Compiler
//!
//! **Sentinel Canvas** turns the node graph drawn on a visual test canvas into a
//! deterministic, human-readable test specification, and reads such specifications
//! back into an editable graph.
//!
//! ## Core Workflow
//!
//! 1.  **Load the canvas**: Deserialize the canvas snapshot into [`canvas::RawCanvas`] and
//!     convert it with the [`canvas::IntoGraph`] trait, or build a [`graph::Graph`] directly.
//! 2.  **Validate**: [`validate`] reports every structural problem at once (cycles,
//!     orphans, dangling edges, incomplete payloads), keyed by node and edge id.
//! 3.  **Compile**: [`compiler::Compiler::builder`] orders the nodes topologically into a
//!     [`spec::Specification`]. Ties are broken by ascending node id, so the result does
//!     not depend on insertion order.
//! 4.  **Serialize**: [`serialize`] writes the canonical text. Equal specifications always
//!     yield byte-identical text.
//! 5.  **Decompile**: [`parse`] reads specification text back into a graph plus metadata.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sentinel_canvas::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = Graph::new();
//!     graph.add_node(Node::new(
//!         "i1",
//!         NodePayload::Input(InputPayload {
//!             query: Some("What is the capital of France?".to_string()),
//!             ..InputPayload::default()
//!         }),
//!         Position::new(250.0, 100.0),
//!     ))?;
//!     graph.add_node(Node::new(
//!         "m1",
//!         NodePayload::Model(ModelPayload {
//!             model: Some("gpt-4".to_string()),
//!             temperature: Some(0.7),
//!             ..ModelPayload::default()
//!         }),
//!         Position::new(250.0, 280.0),
//!     ))?;
//!     graph.add_node(Node::new(
//!         "a1",
//!         NodePayload::Assertion(AssertionPayload::new(
//!             "must_contain",
//!             AssertionValue::Text("Paris".to_string()),
//!         )),
//!         Position::new(250.0, 460.0),
//!     ))?;
//!     graph.connect("e1", "i1", "m1")?;
//!     graph.connect("e2", "m1", "a1")?;
//!
//!     let artifacts = Compiler::builder(&graph)
//!         .with_metadata(SpecMetadata::named("capital check"))
//!         .build()
//!         .compile()?;
//!     let text = serialize(&artifacts.specification);
//!     println!("{text}");
//!
//!     // And back again.
//!     let decompiled = parse(&text)?;
//!     assert_eq!(decompiled.metadata.name, "capital check");
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod compiler;
pub mod error;
pub mod graph;
pub mod parser;
pub mod prelude;
pub mod preview;
pub mod serializer;
pub mod spec;
pub mod validator;

pub use compiler::compile;
pub use parser::parse;
pub use serializer::serialize;
pub use validator::validate;
