pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod render;
pub mod sort;

pub use config::{SortConfig, load_graph};
pub use error::{CycleError, Error, Result};
pub use graph::DependencyGraph;
pub use sort::{KeyOrder, TopoSorter, find_cycle, is_acyclic, topo_sort, topo_sort_sorted};
