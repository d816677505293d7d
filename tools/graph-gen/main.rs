use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentinel_canvas::canvas::RawCanvas;
use sentinel_canvas::graph::{
    AssertionPayload, AssertionValue, Edge, Graph, InputPayload, ModelPayload, Node, NodeKind,
    NodePayload, Position, SystemPayload, ToolPayload,
};
use std::fs;

/// A CLI tool to generate random, valid canvas snapshots for stress-testing the compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated canvas JSON to
    #[arg(short, long, default_value = "generated_canvas.json")]
    output: String,

    /// Number of non-input nodes to generate
    #[arg(short, long, default_value_t = 50)]
    nodes: usize,

    /// Number of input nodes to generate
    #[arg(long, default_value_t = 2)]
    inputs: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const MODELS: &[&str] = &["gpt-4", "gpt-5.1", "claude-3-5-sonnet-20241022", "llama-3-70b"];
const TOOLS: &[&str] = &["browser", "scraper", "calculator", "web_search", "file_reader"];
const ASSERTIONS: &[&str] = &["must_contain", "must_not_contain", "regex_match", "max_latency_ms"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.inputs == 0 {
        eprintln!("Error: --inputs must be at least 1");
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Generating canvas with {} input(s) and {} other node(s)...",
        cli.inputs, cli.nodes
    );
    let graph = generate_graph(&mut rng, cli.inputs, cli.nodes);

    let json_output = RawCanvas::from_graph(&graph)?.to_json()?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} node(s) and {} edge(s) into '{}'",
        graph.nodes().len(),
        graph.edges().len(),
        cli.output
    );
    Ok(())
}

/// Every node gets one to three parents among the nodes created before it, so the
/// result is acyclic and every node is reachable from an input.
fn generate_graph(rng: &mut StdRng, inputs: usize, others: usize) -> Graph {
    let mut nodes = Vec::with_capacity(inputs + others);
    let mut edges = Vec::new();

    for i in 0..inputs {
        let payload = NodePayload::Input(InputPayload {
            query: Some(format!("Generated query #{}", i + 1)),
            ..InputPayload::default()
        });
        nodes.push(Node::new(format!("input-{i:04}"), payload, position(rng)));
    }

    for i in 0..others {
        let payload = random_payload(rng);
        let id = format!("{}-{i:04}", payload.kind());
        let parents = rng.random_range(1..=3).min(nodes.len());
        let mut chosen: Vec<usize> = Vec::with_capacity(parents);
        while chosen.len() < parents {
            let parent = rng.random_range(0..nodes.len());
            if !chosen.contains(&parent) {
                chosen.push(parent);
            }
        }
        for parent in chosen {
            let source: &Node = &nodes[parent];
            // Assertions are leaves; hang the new node off the first input instead.
            let source_id = if source.kind() == NodeKind::Assertion {
                nodes[0].id().to_string()
            } else {
                source.id().to_string()
            };
            let edge_id = format!("e-{source_id}-{id}");
            if !edges.iter().any(|e: &Edge| e.id() == edge_id) {
                edges.push(Edge::new(edge_id, source_id, id.clone()));
            }
        }
        nodes.push(Node::new(id, payload, position(rng)));
    }

    Graph::from_parts(nodes, edges)
}

fn random_payload(rng: &mut StdRng) -> NodePayload {
    match rng.random_range(0..4) {
        0 => NodePayload::Model(ModelPayload {
            provider: Some("openai".to_string()),
            model: Some(pick(rng, MODELS)),
            temperature: Some((rng.random_range(0..=20) as f64) / 10.0),
            max_tokens: Some(rng.random_range(64..4096)),
            seed: Some(rng.random_range(0..1000)),
            ..ModelPayload::default()
        }),
        1 => NodePayload::Tool(ToolPayload {
            name: Some(pick(rng, TOOLS)),
            description: Some("Generated tool".to_string()),
            parameters: None,
        }),
        2 => NodePayload::System(SystemPayload {
            framework: Some("langgraph".to_string()),
            timeout_ms: Some(rng.random_range(1000..60000)),
            ..SystemPayload::default()
        }),
        _ => {
            let kind = pick(rng, ASSERTIONS);
            let expected = if kind == "max_latency_ms" {
                AssertionValue::Number(rng.random_range(100..10000) as f64)
            } else {
                AssertionValue::Text(format!("token-{}", rng.random_range(0..100)))
            };
            NodePayload::Assertion(AssertionPayload::new(&kind, expected))
        }
    }
}

fn pick(rng: &mut StdRng, choices: &[&str]) -> String {
    choices[rng.random_range(0..choices.len())].to_string()
}

fn position(rng: &mut StdRng) -> Position {
    Position::new(rng.random_range(0.0..2000.0), rng.random_range(0.0..2000.0))
}
