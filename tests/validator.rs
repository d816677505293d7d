//! Tests for graph validation: cycles, orphans, dangling edges and payload checks.
mod common;
use common::*;
use sentinel_canvas::prelude::*;

#[test]
fn test_linear_graph_is_valid() {
    let report = validate(&create_linear_graph());
    assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_agent_graph_is_valid() {
    let report = Validator::new(&create_agent_graph()).validate();
    assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
}

#[test]
fn test_two_node_cycle_names_both_nodes() {
    let g = graph(
        vec![input("i1", "q"), model("A", "gpt-4"), model("B", "gpt-4")],
        &[("A", "B"), ("B", "A")],
    );
    let report = validate(&g);

    let cycles: Vec<&GraphError> = report
        .errors
        .iter()
        .filter(|e| matches!(e, GraphError::CycleDetected { .. }))
        .collect();
    assert_eq!(cycles.len(), 1, "the cycle should be reported once");
    match cycles[0] {
        GraphError::CycleDetected { node_ids } => {
            let mut ids = node_ids.clone();
            ids.sort();
            assert_eq!(ids, vec!["A".to_string(), "B".to_string()]);
        }
        _ => panic!("Expected CycleDetected error"),
    }
}

#[test]
fn test_cycle_behind_input_is_detected() {
    let g = graph(
        vec![
            input("i1", "q"),
            model("m1", "gpt-4"),
            tool("t1", "browser"),
            tool("t2", "scraper"),
        ],
        &[("i1", "m1"), ("m1", "t1"), ("t1", "t2"), ("t2", "m1")],
    );
    let report = validate(&g);

    let cycle = report
        .errors
        .iter()
        .find_map(|e| match e {
            GraphError::CycleDetected { node_ids } => Some(node_ids.clone()),
            _ => None,
        })
        .expect("Expected a cycle error");
    assert_eq!(cycle, vec!["m1", "t1", "t2"]);
    assert!(
        !report
            .errors
            .iter()
            .any(|e| matches!(e, GraphError::OrphanNode { .. })),
        "every node is reachable from the input"
    );
}

#[test]
fn test_disconnected_tool_is_orphaned() {
    let mut g = create_linear_graph();
    g.add_node(tool("t1", "browser")).expect("Failed to add node");
    let report = validate(&g);

    assert_eq!(
        report.errors,
        vec![GraphError::OrphanNode {
            node_id: "t1".to_string(),
            reason: OrphanReason::NoIncomingEdge,
        }]
    );
}

#[test]
fn test_node_fed_only_by_orphans_is_unreachable() {
    let g = graph(
        vec![
            input("i1", "q"),
            model("m1", "gpt-4"),
            model("m2", "gpt-4"),
            tool("t1", "browser"),
        ],
        &[("i1", "m1"), ("m2", "t1")],
    );
    let report = validate(&g);

    assert_eq!(
        report.errors,
        vec![
            GraphError::OrphanNode {
                node_id: "m2".to_string(),
                reason: OrphanReason::NoIncomingEdge,
            },
            GraphError::OrphanNode {
                node_id: "t1".to_string(),
                reason: OrphanReason::Unreachable,
            },
        ]
    );
}

#[test]
fn test_missing_assertion_type_is_reported() {
    let g = graph(
        vec![
            input("i1", "q"),
            model("m1", "gpt-4"),
            Node::new(
                "a1",
                NodePayload::Assertion(AssertionPayload {
                    assertion_type: None,
                    expected: Some(AssertionValue::Text("Paris".to_string())),
                }),
                Position::default(),
            ),
        ],
        &[("i1", "m1"), ("m1", "a1")],
    );
    let report = validate(&g);

    assert_eq!(
        report.errors,
        vec![GraphError::IncompletePayload {
            node_id: "a1".to_string(),
            field: "assertionType".to_string(),
        }]
    );
}

#[test]
fn test_blank_fields_count_as_missing() {
    let g = graph(
        vec![
            input("i1", "q"),
            model("m1", "   "),
            tool("t1", ""),
            Node::new(
                "a1",
                NodePayload::Assertion(AssertionPayload::new(
                    "one_of",
                    AssertionValue::List(Vec::new()),
                )),
                Position::default(),
            ),
        ],
        &[("i1", "m1"), ("m1", "t1"), ("t1", "a1")],
    );
    let report = validate(&g);

    let fields: Vec<(&str, &str)> = report
        .errors
        .iter()
        .map(|e| match e {
            GraphError::IncompletePayload { node_id, field } => (node_id.as_str(), field.as_str()),
            other => panic!("Expected IncompletePayload, got {other:?}"),
        })
        .collect();
    assert_eq!(
        fields,
        vec![("a1", "expectedValue"), ("m1", "model"), ("t1", "toolName")]
    );
}

#[test]
fn test_dangling_edge_is_reported_first() {
    let mut g = graph(
        vec![input("i1", "q"), model("m1", "")],
        &[("i1", "m1"), ("m1", "ghost")],
    );
    g.add_node(assertion("a1", "must_contain", "x"))
        .expect("Failed to add node");
    let report = validate(&g);

    assert_eq!(
        report.errors.first(),
        Some(&GraphError::DanglingEdge {
            edge_id: "e-m1-ghost".to_string(),
            missing_node_id: "ghost".to_string(),
        })
    );
    assert_eq!(report.errors[0].edge_id(), Some("e-m1-ghost"));
    assert!(report.errors.contains(&GraphError::IncompletePayload {
        node_id: "m1".to_string(),
        field: "model".to_string(),
    }));
}

#[test]
fn test_duplicate_edges_and_ids_are_reported() {
    let nodes = vec![input("i1", "q"), model("m1", "gpt-4"), model("m1", "gpt-5")];
    let edges = vec![
        Edge::new("e1", "i1", "m1"),
        Edge::new("e2", "i1", "m1"),
    ];
    let report = validate(&Graph::from_parts(nodes, edges));

    assert_eq!(
        report.errors,
        vec![
            GraphError::DuplicateNodeId {
                node_id: "m1".to_string(),
            },
            GraphError::DuplicateEdge {
                edge_id: "e2".to_string(),
                from_node: "i1".to_string(),
                to_node: "m1".to_string(),
            },
        ]
    );
}

#[test]
fn test_self_loop_is_a_cycle() {
    let nodes = vec![input("i1", "q"), model("m1", "gpt-4")];
    let edges = vec![Edge::new("e1", "i1", "m1"), Edge::new("e2", "m1", "m1")];
    let report = validate(&Graph::from_parts(nodes, edges));

    assert_eq!(
        report.errors,
        vec![GraphError::CycleDetected {
            node_ids: vec!["m1".to_string()],
        }]
    );
}

#[test]
fn test_missing_assertions_is_only_a_warning() {
    let g = graph(vec![input("i1", "q"), model("m1", "gpt-4")], &[("i1", "m1")]);
    let report = validate(&g);

    assert!(report.is_valid());
    assert_eq!(report.warnings, vec![GraphWarning::NoAssertions]);
}

#[test]
fn test_errors_for_node_filters_by_id() {
    let mut g = create_linear_graph();
    g.add_node(tool("t1", "")).expect("Failed to add node");
    let report = validate(&g);

    let for_tool: Vec<&GraphError> = report.errors_for_node("t1").collect();
    assert_eq!(for_tool.len(), 2);
    assert_eq!(report.errors_for_node("m1").count(), 0);
}

#[test]
fn test_validation_is_independent_of_insertion_order() {
    let g = create_agent_graph();
    let mut nodes = g.nodes().to_vec();
    let mut edges = g.edges().to_vec();
    nodes.reverse();
    edges.reverse();
    let mut reversed = Graph::from_parts(nodes, edges);
    reversed.add_node(tool("t9", "x")).expect("Failed to add node");
    let mut original = g.clone();
    original.add_node(tool("t9", "x")).expect("Failed to add node");

    assert_eq!(validate(&original), validate(&reversed));
}
