//! Common test utilities for building graphs.
use sentinel_canvas::prelude::*;

#[allow(dead_code)]
pub fn input(id: &str, query: &str) -> Node {
    Node::new(
        id,
        NodePayload::Input(InputPayload {
            query: Some(query.to_string()),
            ..InputPayload::default()
        }),
        Position::default(),
    )
}

#[allow(dead_code)]
pub fn model(id: &str, name: &str) -> Node {
    Node::new(
        id,
        NodePayload::Model(ModelPayload {
            model: Some(name.to_string()),
            ..ModelPayload::default()
        }),
        Position::default(),
    )
}

#[allow(dead_code)]
pub fn tool(id: &str, name: &str) -> Node {
    Node::new(
        id,
        NodePayload::Tool(ToolPayload {
            name: Some(name.to_string()),
            ..ToolPayload::default()
        }),
        Position::default(),
    )
}

#[allow(dead_code)]
pub fn system(id: &str, framework: &str) -> Node {
    Node::new(
        id,
        NodePayload::System(SystemPayload {
            framework: Some(framework.to_string()),
            ..SystemPayload::default()
        }),
        Position::default(),
    )
}

#[allow(dead_code)]
pub fn assertion(id: &str, kind: &str, expected: &str) -> Node {
    Node::new(
        id,
        NodePayload::Assertion(AssertionPayload::new(
            kind,
            AssertionValue::Text(expected.to_string()),
        )),
        Position::default(),
    )
}

/// Builds a graph without structural checks; edge ids are `e-<source>-<target>`.
#[allow(dead_code)]
pub fn graph(nodes: Vec<Node>, edges: &[(&str, &str)]) -> Graph {
    let edges = edges
        .iter()
        .map(|(source, target)| Edge::new(format!("e-{source}-{target}"), *source, *target))
        .collect();
    Graph::from_parts(nodes, edges)
}

/// The canonical scenario: input `i1` -> model `m1` -> assertion `a1`.
#[allow(dead_code)]
pub fn create_linear_graph() -> Graph {
    graph(
        vec![
            input("i1", "What is the capital of France?"),
            model("m1", "gpt-4"),
            assertion("a1", "must_contain", "Paris"),
        ],
        &[("i1", "m1"), ("m1", "a1")],
    )
}

/// A richer graph: one input fanning out to two tools that join on a model.
#[allow(dead_code)]
pub fn create_agent_graph() -> Graph {
    graph(
        vec![
            input("i1", "Find top 3 laptops under $1000"),
            system("s1", "langgraph"),
            tool("t1", "browser"),
            tool("t2", "calculator"),
            Node::new(
                "m1",
                NodePayload::Model(ModelPayload {
                    provider: Some("anthropic".to_string()),
                    model: Some("claude-3-5-sonnet-20241022".to_string()),
                    temperature: Some(0.2),
                    max_tokens: Some(1024),
                    seed: Some(42),
                    ..ModelPayload::default()
                }),
                Position::default(),
            ),
            assertion("a1", "must_call_tool", "browser"),
            Node::new(
                "a2",
                NodePayload::Assertion(AssertionPayload::new(
                    "max_latency_ms",
                    AssertionValue::Number(9000.0),
                )),
                Position::default(),
            ),
        ],
        &[
            ("i1", "s1"),
            ("s1", "t1"),
            ("s1", "t2"),
            ("t1", "m1"),
            ("t2", "m1"),
            ("m1", "a1"),
            ("m1", "a2"),
        ],
    )
}

/// Stage node ids of a compiled specification, in order.
#[allow(dead_code)]
pub fn stage_ids(spec: &Specification) -> Vec<&str> {
    spec.stages().iter().map(Stage::node_id).collect()
}
