use anyhow::Context;
use clap::Parser;
use std::process;
use toposort::{SortConfig, catalog, load_graph, render};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = SortConfig::parse();

    if let Err(e) = run(&config) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(config: &SortConfig) -> anyhow::Result<()> {
    let graph = match &config.graph_path {
        Some(path) => load_graph(path)
            .with_context(|| format!("failed to load graph from {}", path.display()))?,
        None => catalog::course_prerequisites(),
    };

    let order = config.sorter().sort(&graph)?;
    print!("{}", render::render_numbered(&order));
    Ok(())
}
