//! Tests for the topological compilation of graphs into specifications.
mod common;
use common::*;
use sentinel_canvas::prelude::*;

#[test]
fn test_compiler_orders_linear_pipeline() {
    let graph = create_linear_graph();
    let artifacts = Compiler::builder(&graph)
        .build()
        .compile()
        .expect("Failed to compile");

    let spec = &artifacts.specification;
    assert_eq!(stage_ids(spec), vec!["i1", "m1", "a1"]);
    assert_eq!(spec.stages()[1].kind(), NodeKind::Model);
    assert_eq!(spec.metadata().name, "Test from Canvas");
    assert!(artifacts.warnings.is_empty());
}

#[test]
fn test_compiler_breaks_ties_by_ascending_id() {
    let graph = create_agent_graph();
    let spec = compile(&graph, SpecMetadata::default()).expect("Failed to compile");

    assert_eq!(
        stage_ids(&spec),
        vec!["i1", "s1", "t1", "t2", "m1", "a1", "a2"]
    );
}

#[test]
fn test_compiler_ignores_insertion_order() {
    let graph = create_agent_graph();
    let mut nodes = graph.nodes().to_vec();
    let mut edges = graph.edges().to_vec();
    nodes.rotate_left(3);
    edges.reverse();
    let shuffled = Graph::from_parts(nodes, edges);

    let first = compile(&graph, SpecMetadata::default()).expect("Failed to compile");
    let second = compile(&shuffled, SpecMetadata::default()).expect("Failed to compile");
    assert_eq!(first, second);
}

#[test]
fn test_every_edge_points_forward() {
    let graph = create_agent_graph();
    let spec = compile(&graph, SpecMetadata::default()).expect("Failed to compile");

    for edge in graph.edges() {
        let source = spec.position_of(edge.source()).expect("source stage missing");
        let target = spec.position_of(edge.target()).expect("target stage missing");
        assert!(
            source < target,
            "edge {} runs backwards ({} -> {})",
            edge.id(),
            source,
            target
        );
    }
    assert_eq!(spec.len(), graph.nodes().len());
}

#[test]
fn test_independent_inputs_start_in_id_order() {
    let graph = graph(
        vec![
            input("i2", "second"),
            input("i1", "first"),
            model("m1", "gpt-4"),
            assertion("a1", "must_contain", "x"),
        ],
        &[("i2", "m1"), ("i1", "m1"), ("m1", "a1")],
    );
    let spec = compile(&graph, SpecMetadata::default()).expect("Failed to compile");

    assert_eq!(stage_ids(&spec), vec!["i1", "i2", "m1", "a1"]);
}

#[test]
fn test_compiler_refuses_invalid_graph() {
    let mut graph = create_linear_graph();
    graph.add_node(tool("t1", "browser")).expect("Failed to add node");

    let result = Compiler::builder(&graph).build().compile();
    match result {
        Err(CompileError::InvalidGraph { errors }) => {
            assert_eq!(
                errors,
                vec![GraphError::OrphanNode {
                    node_id: "t1".to_string(),
                    reason: OrphanReason::NoIncomingEdge,
                }]
            );
        }
        other => panic!("Expected InvalidGraph error, got {other:?}"),
    }
}

#[test]
fn test_compiler_reports_every_problem_of_a_cycle() {
    let graph = graph(
        vec![input("i1", "q"), model("A", "gpt-4"), model("B", "gpt-4")],
        &[("A", "B"), ("B", "A")],
    );

    let error = compile(&graph, SpecMetadata::default()).expect_err("Expected compilation to fail");
    let errors = error.graph_errors();
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| matches!(e, GraphError::CycleDetected { .. })));
    assert!(error.to_string().contains("Cycle detected"));
}

#[test]
fn test_compiler_carries_warnings_and_metadata() {
    let graph = graph(vec![input("i1", "q"), model("m1", "gpt-4")], &[("i1", "m1")]);
    let artifacts = Compiler::builder(&graph)
        .with_name("smoke")
        .with_tag("fast")
        .with_tag("nightly")
        .build()
        .compile()
        .expect("Failed to compile");

    assert_eq!(artifacts.warnings, vec![GraphWarning::NoAssertions]);
    let metadata = artifacts.specification.metadata();
    assert_eq!(metadata.name, "smoke");
    assert_eq!(metadata.tags, vec!["fast", "nightly"]);
    assert_eq!(artifacts.specification.assertions().count(), 0);
}

#[test]
fn test_multiple_models_and_tools_become_separate_stages() {
    let graph = graph(
        vec![
            input("i1", "q"),
            model("m1", "gpt-4"),
            model("m2", "gpt-5.1"),
            tool("t1", "browser"),
            tool("t2", "browser"),
            assertion("a1", "must_call_tool", "browser"),
        ],
        &[
            ("i1", "m1"),
            ("i1", "m2"),
            ("m1", "t1"),
            ("m2", "t2"),
            ("t1", "a1"),
            ("t2", "a1"),
        ],
    );
    let spec = compile(&graph, SpecMetadata::default()).expect("Failed to compile");

    assert_eq!(stage_ids(&spec), vec!["i1", "m1", "m2", "t1", "t2", "a1"]);
    assert_eq!(spec.pipeline().count(), 5);
}

#[test]
fn test_empty_graph_compiles_to_empty_specification() {
    let artifacts = Compiler::builder(&Graph::new())
        .with_metadata(SpecMetadata::named("empty"))
        .build()
        .compile()
        .expect("Failed to compile");

    assert!(artifacts.specification.is_empty());
    assert_eq!(artifacts.warnings, vec![GraphWarning::NoAssertions]);
}
