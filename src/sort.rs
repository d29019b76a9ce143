//! Topological ordering by depth-first search with tri-color marking.
//!
//! A node is appended to the output only after every one of its
//! prerequisites has been, so prerequisites always precede dependents.
//! Reaching a node that is still on the active path means a cycle; the
//! whole sort is abandoned and no partial order is returned.

use crate::error::{CycleError, Error};
use crate::graph::DependencyGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use tracing::{debug, warn};

/// Order in which top-level keys start a traversal.
///
/// Only the relative order of unrelated nodes depends on this; every choice
/// yields a valid topological order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrder {
    /// Keys in the order they were added to the graph.
    #[default]
    Insertion,
    /// Keys in ascending order.
    Sorted,
}

impl KeyOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyOrder::Insertion => "insertion",
            KeyOrder::Sorted => "sorted",
        }
    }
}

impl fmt::Display for KeyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeyOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insertion" => Ok(KeyOrder::Insertion),
            "sorted" => Ok(KeyOrder::Sorted),
            _ => Err(Error::InvalidKeyOrder(s.to_string())),
        }
    }
}

/// Sorts dependency graphs with a fixed key iteration strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopoSorter {
    key_order: KeyOrder,
}

impl TopoSorter {
    pub fn new(key_order: KeyOrder) -> Self {
        Self { key_order }
    }

    pub fn key_order(&self) -> KeyOrder {
        self.key_order
    }

    pub fn sort<N>(&self, graph: &DependencyGraph<N>) -> Result<Vec<N>, CycleError<N>>
    where
        N: Ord + Hash + Clone,
    {
        match self.key_order {
            KeyOrder::Insertion => topo_sort(graph),
            KeyOrder::Sorted => topo_sort_sorted(graph),
        }
    }
}

/// Order every node of `graph`, visiting keys in insertion order.
pub fn topo_sort<N>(graph: &DependencyGraph<N>) -> Result<Vec<N>, CycleError<N>>
where
    N: Eq + Hash + Clone,
{
    run(graph, graph.keys())
}

/// Order every node of `graph`, visiting keys in ascending order.
pub fn topo_sort_sorted<N>(graph: &DependencyGraph<N>) -> Result<Vec<N>, CycleError<N>>
where
    N: Ord + Hash + Clone,
{
    let mut keys: Vec<&N> = graph.keys().collect();
    keys.sort();
    run(graph, keys)
}

pub fn is_acyclic<N: Eq + Hash + Clone>(graph: &DependencyGraph<N>) -> bool {
    topo_sort(graph).is_ok()
}

/// The first cycle an insertion-order sort runs into, if any.
pub fn find_cycle<N: Eq + Hash + Clone>(graph: &DependencyGraph<N>) -> Option<CycleError<N>> {
    topo_sort(graph).err()
}

fn run<'a, N>(
    graph: &'a DependencyGraph<N>,
    roots: impl IntoIterator<Item = &'a N>,
) -> Result<Vec<N>, CycleError<N>>
where
    N: Eq + Hash + Clone,
{
    debug!(keys = graph.len(), "sorting dependency graph");

    let mut traversal = Traversal::new(graph);
    for root in roots {
        if let Err(err) = traversal.visit(root) {
            warn!(
                cycle_len = err.path().len().saturating_sub(1),
                "dependency cycle detected, no ordering produced"
            );
            return Err(err);
        }
    }

    debug!(nodes = traversal.order.len(), "dependency graph sorted");
    Ok(traversal.order)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the active traversal path.
    Visiting,
    Done,
}

/// A node on the active path and the position of its next prerequisite.
struct Frame<'a, N> {
    node: &'a N,
    next: usize,
}

/// State for one sort call. Nothing here outlives the call.
struct Traversal<'a, N> {
    graph: &'a DependencyGraph<N>,
    marks: HashMap<&'a N, Mark>,
    stack: Vec<Frame<'a, N>>,
    order: Vec<N>,
}

impl<'a, N> Traversal<'a, N>
where
    N: Eq + Hash + Clone,
{
    fn new(graph: &'a DependencyGraph<N>) -> Self {
        Self {
            graph,
            marks: HashMap::new(),
            stack: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Depth-first walk from `root`, equivalent to the recursive visit but
    /// bounded by heap rather than call-stack space.
    fn visit(&mut self, root: &'a N) -> Result<(), CycleError<N>> {
        let graph = self.graph;
        self.enter(root)?;

        while let Some(frame) = self.stack.last_mut() {
            match graph.prerequisites(frame.node).get(frame.next) {
                Some(prerequisite) => {
                    frame.next += 1;
                    self.enter(prerequisite)?;
                }
                None => {
                    let node = frame.node;
                    self.stack.pop();
                    self.marks.insert(node, Mark::Done);
                    self.order.push(node.clone());
                }
            }
        }

        Ok(())
    }

    fn enter(&mut self, node: &'a N) -> Result<(), CycleError<N>> {
        match self.marks.get(node).copied() {
            Some(Mark::Done) => Ok(()),
            Some(Mark::Visiting) => Err(self.cycle_at(node)),
            None => {
                self.marks.insert(node, Mark::Visiting);
                self.stack.push(Frame { node, next: 0 });
                Ok(())
            }
        }
    }

    fn cycle_at(&self, node: &N) -> CycleError<N> {
        let start = self.stack.iter().position(|frame| frame.node == node);
        debug_assert!(start.is_some(), "visiting node missing from traversal stack");
        let start = start.unwrap_or(0);
        let mut path: Vec<N> = self.stack[start..]
            .iter()
            .map(|frame| frame.node.clone())
            .collect();
        path.push(node.clone());
        CycleError::new(node.clone(), path)
    }
}
