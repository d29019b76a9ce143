//! Error types for dependency ordering.

use std::fmt::Display;
use std::io;

/// Result type alias for graph loading and sorting.
pub type Result<T> = std::result::Result<T, Error>;

/// A cycle found while ordering a dependency graph.
///
/// `node` is the node that was reached again while it was still on the
/// active traversal path. `path` walks the cycle from `node` back to itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cycle detected: {node} is part of a cycle ({path})", path = format_cycle(path))]
pub struct CycleError<N> {
    node: N,
    path: Vec<N>,
}

impl<N> CycleError<N> {
    pub(crate) fn new(node: N, path: Vec<N>) -> Self {
        Self { node, path }
    }

    /// The node whose re-visit triggered detection.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// The cycle, starting and ending with [`CycleError::node`].
    pub fn path(&self) -> &[N] {
        &self.path
    }

    pub fn into_node(self) -> N {
        self.node
    }
}

/// Errors surfaced by the outer layers (config, loading, the binary).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No valid ordering exists.
    #[error(transparent)]
    Cycle(#[from] CycleError<String>),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed graph file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown key iteration strategy.
    #[error("Invalid key order: {0} (expected `insertion` or `sorted`)")]
    InvalidKeyOrder(String),
}

/// Format a cycle path as `a → b → a`.
pub fn format_cycle<N: Display>(path: &[N]) -> String {
    path.iter()
        .map(|node| node.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}
