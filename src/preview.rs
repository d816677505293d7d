//! Live preview of the specification text while a graph is being edited.
//!
//! Every edit may trigger a recompile, and recompiles may finish out of order. A
//! [`PreviewBoard`] keeps whatever the most recently *requested* render produced and
//! drops results that arrive after a newer one has been shown.

use crate::compiler::Compiler;
use crate::error::{CompileError, GraphError, GraphWarning};
use crate::graph::Graph;
use crate::serializer::serialize;
use crate::spec::SpecMetadata;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

/// What the preview pane shows for one graph snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutput {
    Ready {
        text: String,
        warnings: Vec<GraphWarning>,
    },
    Blocked {
        errors: Vec<GraphError>,
    },
}

impl PreviewOutput {
    pub fn is_ready(&self) -> bool {
        matches!(self, PreviewOutput::Ready { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            PreviewOutput::Ready { text, .. } => Some(text),
            PreviewOutput::Blocked { .. } => None,
        }
    }
}

/// Compiles and serializes `graph`, or reports why it cannot be compiled.
pub fn render_preview(graph: &Graph, metadata: &SpecMetadata) -> PreviewOutput {
    match Compiler::builder(graph).with_metadata(metadata.clone()).build().compile() {
        Ok(artifacts) => PreviewOutput::Ready {
            text: serialize(&artifacts.specification),
            warnings: artifacts.warnings,
        },
        Err(CompileError::InvalidGraph { errors }) => PreviewOutput::Blocked { errors },
        Err(CompileError::Unordered { remaining }) => PreviewOutput::Blocked {
            errors: vec![GraphError::CycleDetected { node_ids: remaining }],
        },
    }
}

/// Sequence number handed out when a render is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreviewTicket(u64);

impl PreviewTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Last-write-wins holder for the preview shown to the user.
#[derive(Debug, Default)]
pub struct PreviewBoard {
    next: AtomicU64,
    shown: Mutex<Option<(PreviewTicket, PreviewOutput)>>,
}

impl PreviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a ticket for a render about to start. Tickets strictly increase.
    pub fn request(&self) -> PreviewTicket {
        PreviewTicket(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Shows `output` unless a render with a newer ticket is already shown.
    ///
    /// Returns whether the output was accepted.
    pub fn publish(&self, ticket: PreviewTicket, output: PreviewOutput) -> bool {
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        if shown.as_ref().is_some_and(|(current, _)| *current >= ticket) {
            trace!(ticket = ticket.0, "discarding stale preview");
            return false;
        }
        debug!(ticket = ticket.0, ready = output.is_ready(), "publishing preview");
        *shown = Some((ticket, output));
        true
    }

    pub fn current(&self) -> Option<PreviewOutput> {
        let shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        shown.as_ref().map(|(_, output)| output.clone())
    }

    /// Convenience for synchronous callers: request, render and publish in one go.
    pub fn refresh(&self, graph: &Graph, metadata: &SpecMetadata) -> bool {
        let ticket = self.request();
        self.publish(ticket, render_preview(graph, metadata))
    }
}
