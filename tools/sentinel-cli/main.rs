use clap::{Parser, Subcommand};
use sentinel_canvas::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compile canvas test graphs into specifications and back
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a canvas snapshot and list every problem found
    Check {
        /// Path to the canvas JSON snapshot
        canvas_path: String,
    },
    /// Compile a canvas snapshot into specification text
    Compile {
        /// Path to the canvas JSON snapshot
        canvas_path: String,
        /// Write the specification here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// May be given more than once
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Rebuild a canvas snapshot from specification text
    Decompile {
        /// Path to the specification file
        spec_path: String,
        /// Write the canvas JSON here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { canvas_path } => run_check(&canvas_path),
        Command::Compile {
            canvas_path,
            output,
            name,
            description,
            category,
            tags,
        } => {
            let mut metadata = SpecMetadata {
                description,
                category,
                tags,
                ..SpecMetadata::default()
            };
            if let Some(name) = name {
                metadata.name = name;
            }
            run_compile(&canvas_path, metadata, output.as_deref());
        }
        Command::Decompile { spec_path, output } => run_decompile(&spec_path, output.as_deref()),
    }
}

fn load_graph(canvas_path: &str) -> Graph {
    let canvas_json = fs::read_to_string(canvas_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read canvas file '{}': {}", canvas_path, e))
    });
    RawCanvas::from_json(&canvas_json)
        .and_then(|canvas| canvas.into_graph())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load canvas: {}", e)))
}

fn run_check(canvas_path: &str) {
    let graph = load_graph(canvas_path);
    let report = validate(&graph);

    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    for error in &report.errors {
        println!("error: {}", error);
    }
    if !report.is_valid() {
        exit_with_error(&format!("{} problem(s) found", report.errors.len()));
    }
    println!(
        "OK: {} node(s), {} edge(s)",
        graph.nodes().len(),
        graph.edges().len()
    );
}

fn run_compile(canvas_path: &str, metadata: SpecMetadata, output: Option<&str>) {
    let graph = load_graph(canvas_path);

    let start = Instant::now();
    let artifacts = Compiler::builder(&graph)
        .with_metadata(metadata)
        .build()
        .compile()
        .unwrap_or_else(|e| match e {
            CompileError::InvalidGraph { errors } => {
                for error in &errors {
                    eprintln!("error: {}", error);
                }
                exit_with_error(&format!("Compilation refused: {} problem(s)", errors.len()))
            }
            other => exit_with_error(&format!("Compilation failed: {}", other)),
        });
    for warning in &artifacts.warnings {
        eprintln!("warning: {}", warning);
    }
    let text = serialize(&artifacts.specification);
    info!(
        stages = artifacts.specification.len(),
        elapsed = ?start.elapsed(),
        "compiled canvas"
    );

    write_output(output, &text);
}

fn run_decompile(spec_path: &str, output: Option<&str>) {
    let text = fs::read_to_string(spec_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read specification '{}': {}", spec_path, e))
    });
    let decompiled =
        parse(&text).unwrap_or_else(|e| exit_with_error(&format!("Failed to parse: {}", e)));
    info!(
        name = %decompiled.metadata.name,
        nodes = decompiled.graph.nodes().len(),
        "decompiled specification"
    );

    let canvas_json = RawCanvas::from_graph(&decompiled.graph)
        .and_then(|canvas| canvas.to_json())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode canvas: {}", e)));
    write_output(output, &canvas_json);
}

fn write_output(output: Option<&str>, content: &str) {
    match output {
        Some(path) => {
            fs::write(path, content).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path, e))
            });
            println!("Wrote '{}'", path);
        }
        None => print!("{}", content),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
