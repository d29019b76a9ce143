//! Startup configuration.

use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::sort::{KeyOrder, TopoSorter};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for the `toposort` binary, from flags or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "toposort")]
#[command(about = "Print a dependency graph in topological order")]
pub struct SortConfig {
    /// Order in which top-level keys are visited
    #[arg(
        long,
        env = "TOPOSORT_KEY_ORDER",
        value_enum,
        ignore_case = true,
        default_value_t
    )]
    pub key_order: KeyOrder,

    /// JSON graph to sort instead of the built-in course catalogue
    #[arg(long, env = "TOPOSORT_GRAPH")]
    pub graph_path: Option<PathBuf>,
}

impl SortConfig {
    pub fn sorter(&self) -> TopoSorter {
        TopoSorter::new(self.key_order)
    }
}

/// Load a graph from a JSON object of `node -> [prerequisites]`.
///
/// Key order in the file becomes the graph's insertion order.
pub fn load_graph(path: impl AsRef<Path>) -> Result<DependencyGraph<String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let graph: DependencyGraph<String> = serde_json::from_str(&contents)?;
    debug!(path = %path.display(), keys = graph.len(), "loaded dependency graph");
    Ok(graph)
}
