//! Unit tests for the graph editing helpers, payload checks and error messages.
mod common;
use common::*;
use sentinel_canvas::prelude::*;

#[test]
fn test_node_kind_names() {
    for kind in [
        NodeKind::Input,
        NodeKind::Model,
        NodeKind::Tool,
        NodeKind::System,
        NodeKind::Assertion,
    ] {
        assert_eq!(NodeKind::from_name(kind.as_str()), Some(kind));
        assert_eq!(kind.to_string(), kind.as_str());
    }
    assert_eq!(NodeKind::from_name("Model"), None);
}

#[test]
fn test_missing_fields_uses_canvas_names() {
    assert_eq!(
        NodePayload::Assertion(AssertionPayload::default()).missing_fields(),
        vec!["assertionType", "expectedValue"]
    );
    assert_eq!(
        NodePayload::Tool(ToolPayload::default()).missing_fields(),
        vec!["toolName"]
    );
    assert!(
        NodePayload::Input(InputPayload::default())
            .missing_fields()
            .is_empty()
    );
    assert!(
        NodePayload::Assertion(AssertionPayload::new("max_latency_ms", AssertionValue::Number(0.0)))
            .missing_fields()
            .is_empty(),
        "zero is a value"
    );
}

#[test]
fn test_add_node_rejects_duplicate_id() {
    let mut graph = Graph::new();
    graph.add_node(input("i1", "q")).expect("Failed to add node");
    match graph.add_node(model("i1", "gpt-4")) {
        Err(GraphEditError::DuplicateNodeId(id)) => assert_eq!(id, "i1"),
        other => panic!("Expected DuplicateNodeId error, got {other:?}"),
    }
    assert_eq!(graph.nodes().len(), 1);
}

#[test]
fn test_connect_enforces_edge_invariants() {
    let mut graph = Graph::new();
    graph.add_node(input("i1", "q")).expect("Failed to add node");
    graph.add_node(model("m1", "gpt-4")).expect("Failed to add node");
    graph.connect("e1", "i1", "m1").expect("Failed to connect");

    assert_eq!(
        graph.connect("e2", "i1", "ghost"),
        Err(GraphEditError::UnknownNode("ghost".to_string()))
    );
    assert_eq!(
        graph.connect("e2", "m1", "m1"),
        Err(GraphEditError::SelfLoop("m1".to_string()))
    );
    assert_eq!(
        graph.connect("e1", "m1", "i1"),
        Err(GraphEditError::DuplicateEdgeId("e1".to_string()))
    );
    assert_eq!(
        graph.connect("e2", "i1", "m1"),
        Err(GraphEditError::DuplicateConnection {
            from_node: "i1".to_string(),
            to_node: "m1".to_string(),
        })
    );
    assert_eq!(graph.edges().len(), 1);
}

#[test]
fn test_remove_node_cascades_edges() {
    let mut graph = create_linear_graph();
    let removed = graph.remove_node("m1").expect("Expected m1 to exist");

    assert_eq!(removed.id(), "m1");
    assert!(graph.edges().is_empty());
    assert!(graph.remove_node("m1").is_none());
    assert_eq!(graph.outgoing("i1").count(), 0);
}

#[test]
fn test_remove_edge_and_lookups() {
    let mut graph = create_linear_graph();
    assert_eq!(graph.incoming("m1").map(Edge::source).collect::<Vec<_>>(), vec!["i1"]);
    assert_eq!(graph.outgoing("m1").map(Edge::target).collect::<Vec<_>>(), vec!["a1"]);

    let removed = graph.remove_edge("e-m1-a1").expect("Expected edge to exist");
    assert_eq!(removed.target(), "a1");
    assert!(graph.edge("e-m1-a1").is_none());
    assert!(graph.contains_node("a1"));
}

#[test]
fn test_update_payload_keeps_kind() {
    let mut graph = create_linear_graph();
    let updated = NodePayload::Model(ModelPayload {
        model: Some("gpt-5.1".to_string()),
        temperature: Some(0.3),
        ..ModelPayload::default()
    });
    graph
        .update_payload("m1", updated.clone())
        .expect("Failed to update payload");
    assert_eq!(graph.node("m1").map(Node::payload), Some(&updated));

    match graph.update_payload("m1", NodePayload::Tool(ToolPayload::default())) {
        Err(GraphEditError::KindChange { node_id, from, to }) => {
            assert_eq!(node_id, "m1");
            assert_eq!(from, NodeKind::Model);
            assert_eq!(to, NodeKind::Tool);
        }
        other => panic!("Expected KindChange error, got {other:?}"),
    }
}

#[test]
fn test_move_node_changes_only_position() {
    let mut graph = create_linear_graph();
    let before = validate(&graph);
    graph
        .move_node("a1", Position::new(10.0, -5.0))
        .expect("Failed to move node");

    assert_eq!(
        graph.node("a1").map(|n| n.position),
        Some(Position::new(10.0, -5.0))
    );
    assert_eq!(validate(&graph), before);
    assert_eq!(
        graph.move_node("zz", Position::default()),
        Err(GraphEditError::UnknownNode("zz".to_string()))
    );
}

#[test]
fn test_specification_accessors() {
    let spec = compile(&create_agent_graph(), SpecMetadata::default()).expect("Failed to compile");

    assert_eq!(spec.position_of("m1"), Some(4));
    assert_eq!(spec.position_of("missing"), None);
    let kinds: Vec<&str> = spec
        .assertions()
        .filter_map(|a| a.assertion_type.as_deref())
        .collect();
    assert_eq!(kinds, vec!["must_call_tool", "max_latency_ms"]);
    assert!(spec.pipeline().all(|s| s.kind() != NodeKind::Assertion));
}

#[test]
fn test_error_messages() {
    let cycle = GraphError::CycleDetected {
        node_ids: vec!["a".to_string(), "b".to_string()],
    };
    assert_eq!(cycle.to_string(), "Cycle detected through nodes [a -> b]");
    assert_eq!(cycle.node_ids(), vec!["a", "b"]);
    assert_eq!(cycle.edge_id(), None);

    let orphan = GraphError::OrphanNode {
        node_id: "t1".to_string(),
        reason: OrphanReason::NoIncomingEdge,
    };
    assert_eq!(orphan.to_string(), "Node 't1' is orphaned: it has no incoming edge");

    let refused = CompileError::InvalidGraph {
        errors: vec![cycle, orphan],
    };
    assert_eq!(refused.graph_errors().len(), 2);
    assert!(refused.to_string().starts_with("Graph is invalid (2 problem(s))"));

    let malformed = ParseError::MalformedStage {
        stage: "stages[1]".to_string(),
        field: "model".to_string(),
        reason: "required field is missing".to_string(),
    };
    assert_eq!(
        malformed.to_string(),
        "Stage stages[1] is malformed at 'model': required field is missing"
    );
}
