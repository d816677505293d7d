use crate::error::{CompileError, GraphWarning};
use crate::graph::{Graph, GraphIndex};
use crate::spec::{SpecMetadata, Specification, Stage};
use crate::validator::Validator;
use tracing::{debug, instrument, warn};

mod ordering;

/// Everything a successful compile produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationArtifacts {
    pub specification: Specification,
    pub warnings: Vec<GraphWarning>,
}

pub struct Compiler<'g> {
    graph: &'g Graph,
    metadata: SpecMetadata,
}

pub struct CompilerBuilder<'g> {
    graph: &'g Graph,
    metadata: SpecMetadata,
}

impl<'g> CompilerBuilder<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            metadata: SpecMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: SpecMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = name.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.tags.push(tag.into());
        self
    }

    pub fn build(self) -> Compiler<'g> {
        Compiler {
            graph: self.graph,
            metadata: self.metadata,
        }
    }
}

impl<'g> Compiler<'g> {
    pub fn builder(graph: &'g Graph) -> CompilerBuilder<'g> {
        CompilerBuilder::new(graph)
    }

    /// Validates the graph and orders its nodes into stages.
    ///
    /// Any fatal validation error refuses the whole compile; the caller gets the full
    /// error list and never a partial specification.
    #[instrument(level = "trace", skip(self), fields(name = %self.metadata.name))]
    pub fn compile(self) -> Result<CompilationArtifacts, CompileError> {
        let warnings = Validator::new(self.graph)
            .validate()
            .into_result()
            .map_err(|errors| CompileError::InvalidGraph { errors })?;
        for warning in &warnings {
            warn!(%warning, "compiling with warning");
        }

        let index = GraphIndex::build(self.graph);
        let order = ordering::topological_order(&index)?;
        let stages: Vec<Stage> = order
            .into_iter()
            .map(|i| {
                let node = index.node(i);
                Stage::new(node.id(), node.payload().clone())
            })
            .collect();

        debug!(
            nodes = self.graph.nodes().len(),
            edges = self.graph.edges().len(),
            stages = stages.len(),
            "compiled graph"
        );

        Ok(CompilationArtifacts {
            specification: Specification::new(self.metadata, stages),
            warnings,
        })
    }
}

/// Compiles `graph` into a specification carrying `metadata`.
pub fn compile(graph: &Graph, metadata: SpecMetadata) -> Result<Specification, CompileError> {
    Compiler::builder(graph)
        .with_metadata(metadata)
        .build()
        .compile()
        .map(|artifacts| artifacts.specification)
}
