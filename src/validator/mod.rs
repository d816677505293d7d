//! Structural checks over a graph snapshot.
//!
//! Every check runs on every call and all findings are accumulated, so the editing
//! surface can show the complete list of problems at once.

mod cycles;
mod reachability;

use crate::error::{GraphError, GraphWarning};
use crate::graph::{Graph, GraphIndex, NodeKind};
use itertools::Itertools;
use tracing::{debug, instrument};

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub errors: Vec<GraphError>,
    pub warnings: Vec<GraphWarning>,
}

impl ValidationReport {
    /// `true` when no fatal error was found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Splits the report into the warnings of a valid graph or the errors of an invalid one.
    pub fn into_result(self) -> Result<Vec<GraphWarning>, Vec<GraphError>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }

    /// All errors that mention `node_id`.
    pub fn errors_for_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphError> {
        self.errors
            .iter()
            .filter(move |e| e.node_ids().contains(&node_id))
    }
}

pub struct Validator<'g> {
    graph: &'g Graph,
}

impl<'g> Validator<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    #[instrument(level = "trace", skip(self), fields(nodes = self.graph.nodes().len(), edges = self.graph.edges().len()))]
    pub fn validate(&self) -> ValidationReport {
        let index = GraphIndex::build(self.graph);
        let mut report = ValidationReport::default();

        self.check_edges(&index, &mut report);
        self.check_cycles(&index, &mut report);
        self.check_connectivity(&index, &mut report);
        self.check_payloads(&index, &mut report);

        if !index.nodes().any(|(_, n)| n.kind() == NodeKind::Assertion) {
            report.warnings.push(GraphWarning::NoAssertions);
        }

        debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validated graph"
        );
        report
    }

    fn check_edges(&self, index: &GraphIndex<'g>, report: &mut ValidationReport) {
        let dangling = index
            .dangling
            .iter()
            .sorted_by(|a, b| (a.0.id(), a.1).cmp(&(b.0.id(), b.1)))
            .map(|(edge, missing)| GraphError::DanglingEdge {
                edge_id: edge.id().to_string(),
                missing_node_id: missing.to_string(),
            });
        report.errors.extend(dangling);

        let duplicate_nodes = index
            .duplicate_nodes
            .iter()
            .dedup()
            .map(|id| GraphError::DuplicateNodeId {
                node_id: id.to_string(),
            });
        report.errors.extend(duplicate_nodes);

        let duplicate_edges = index
            .duplicate_edges
            .iter()
            .sorted_by(|a, b| a.id().cmp(b.id()))
            .map(|edge| GraphError::DuplicateEdge {
                edge_id: edge.id().to_string(),
                from_node: edge.source().to_string(),
                to_node: edge.target().to_string(),
            });
        report.errors.extend(duplicate_edges);
    }

    fn check_cycles(&self, index: &GraphIndex<'g>, report: &mut ValidationReport) {
        for cycle in cycles::find_cycles(index) {
            report.errors.push(GraphError::CycleDetected {
                node_ids: cycle.into_iter().map(|i| index.id(i).to_string()).collect(),
            });
        }
    }

    fn check_connectivity(&self, index: &GraphIndex<'g>, report: &mut ValidationReport) {
        for (i, reason) in reachability::find_orphans(index) {
            report.errors.push(GraphError::OrphanNode {
                node_id: index.id(i).to_string(),
                reason,
            });
        }
    }

    fn check_payloads(&self, index: &GraphIndex<'g>, report: &mut ValidationReport) {
        for (_, node) in index.nodes() {
            for field in node.payload().missing_fields() {
                report.errors.push(GraphError::IncompletePayload {
                    node_id: node.id().to_string(),
                    field: field.to_string(),
                });
            }
        }
    }
}

/// Validates `graph`. Shorthand for `Validator::new(graph).validate()`.
pub fn validate(graph: &Graph) -> ValidationReport {
    Validator::new(graph).validate()
}
