//! Dependency graph: node → ordered list of prerequisites.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::iter;
use std::marker::PhantomData;

/// A mapping from each node to the nodes it depends on.
///
/// Keys keep their insertion order, which makes key iteration (and therefore
/// the output of an insertion-order sort) reproducible. A node may appear only
/// as a prerequisite; such nodes are leaves with nothing to wait on.
#[derive(Debug, Clone)]
pub struct DependencyGraph<N> {
    entries: Vec<(N, Vec<N>)>,
    index: HashMap<N, usize>,
}

impl<N> Default for DependencyGraph<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<N: PartialEq> PartialEq for DependencyGraph<N> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<N: Eq> Eq for DependencyGraph<N> {}

impl<N: Eq + Hash + Clone> DependencyGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys (nodes with an explicit prerequisite list).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set the prerequisites of `node`.
    ///
    /// An existing key keeps its position and gets the new list; the old list
    /// is returned.
    pub fn insert(&mut self, node: N, prerequisites: Vec<N>) -> Option<Vec<N>> {
        if let Some(&i) = self.index.get(&node) {
            return Some(std::mem::replace(&mut self.entries[i].1, prerequisites));
        }
        self.index.insert(node.clone(), self.entries.len());
        self.entries.push((node, prerequisites));
        None
    }

    /// Record that `node` depends on `prerequisite`.
    pub fn add_prerequisite(&mut self, node: N, prerequisite: N) {
        let i = match self.index.get(&node) {
            Some(&i) => i,
            None => {
                self.insert(node, Vec::new());
                self.entries.len() - 1
            }
        };
        self.entries[i].1.push(prerequisite);
    }

    /// Direct prerequisites of `node`, in their given order. Empty for leaves.
    pub fn prerequisites(&self, node: &N) -> &[N] {
        self.index
            .get(node)
            .map(|&i| self.entries[i].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &N> {
        self.entries.iter().map(|(node, _)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, &[N])> {
        self.entries
            .iter()
            .map(|(node, prerequisites)| (node, prerequisites.as_slice()))
    }

    /// Every distinct node, keys and prerequisites alike, in first-seen order.
    pub fn nodes(&self) -> Vec<&N> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        for (node, prerequisites) in &self.entries {
            for n in iter::once(node).chain(prerequisites) {
                if seen.insert(n) {
                    nodes.push(n);
                }
            }
        }
        nodes
    }

    /// Every `(dependent, prerequisite)` edge, duplicates included.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> {
        self.entries.iter().flat_map(|(node, prerequisites)| {
            prerequisites.iter().map(move |prerequisite| (node, prerequisite))
        })
    }

    /// Check whether making `from` depend on `to` would close a cycle.
    ///
    /// Returns the cycle `[from, to, ..., from]` if it would. The graph is not
    /// modified.
    pub fn would_create_cycle<'a>(&'a self, from: &N, to: &'a N) -> Option<Vec<N>> {
        if from == to {
            return Some(vec![from.clone(), from.clone()]);
        }

        // Search for an existing path to -> ... -> from.
        let mut visited: HashSet<&'a N> = HashSet::from([to]);
        let mut stack: Vec<(&'a N, usize)> = vec![(to, 0)];

        while let Some((node, next)) = stack.last_mut() {
            let Some(prerequisite) = self.prerequisites(*node).get(*next) else {
                stack.pop();
                continue;
            };
            *next += 1;

            if prerequisite == from {
                let mut cycle = vec![from.clone()];
                cycle.extend(stack.iter().map(|(n, _)| (*n).clone()));
                cycle.push(from.clone());
                return Some(cycle);
            }
            if visited.insert(prerequisite) {
                stack.push((prerequisite, 0));
            }
        }

        None
    }
}

impl<N: Eq + Hash + Clone> FromIterator<(N, Vec<N>)> for DependencyGraph<N> {
    fn from_iter<I: IntoIterator<Item = (N, Vec<N>)>>(iter: I) -> Self {
        let mut graph = Self::new();
        for (node, prerequisites) in iter {
            graph.insert(node, prerequisites);
        }
        graph
    }
}

impl<N: Eq + Hash + Clone, const K: usize> From<[(N, Vec<N>); K]> for DependencyGraph<N> {
    fn from(entries: [(N, Vec<N>); K]) -> Self {
        entries.into_iter().collect()
    }
}

/// Keys follow the map's own (unspecified) iteration order.
impl<N: Eq + Hash + Clone> From<HashMap<N, Vec<N>>> for DependencyGraph<N> {
    fn from(map: HashMap<N, Vec<N>>) -> Self {
        map.into_iter().collect()
    }
}

impl<N: Eq + Hash + Clone> From<BTreeMap<N, Vec<N>>> for DependencyGraph<N> {
    fn from(map: BTreeMap<N, Vec<N>>) -> Self {
        map.into_iter().collect()
    }
}

impl<N: Serialize> Serialize for DependencyGraph<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (node, prerequisites) in &self.entries {
            map.serialize_entry(node, prerequisites)?;
        }
        map.end()
    }
}

impl<'de, N> Deserialize<'de> for DependencyGraph<N>
where
    N: Deserialize<'de> + Eq + Hash + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GraphVisitor(PhantomData))
    }
}

struct GraphVisitor<N>(PhantomData<N>);

impl<'de, N> Visitor<'de> for GraphVisitor<N>
where
    N: Deserialize<'de> + Eq + Hash + Clone,
{
    type Value = DependencyGraph<N>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from node to a list of prerequisites")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut graph = DependencyGraph::new();
        while let Some((node, prerequisites)) = access.next_entry::<N, Vec<N>>()? {
            graph.insert(node, prerequisites);
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut graph = DependencyGraph::new();
        assert!(graph.insert("b", vec!["x"]).is_none());
        assert!(graph.insert("a", vec![]).is_none());

        let old = graph.insert("b", vec!["y", "z"]);
        assert_eq!(old, Some(vec!["x"]));
        assert_eq!(graph.keys().copied().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(graph.prerequisites(&"b"), &["y", "z"]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_add_prerequisite() {
        let mut graph = DependencyGraph::new();
        graph.add_prerequisite("compilers", "data structures");
        graph.add_prerequisite("compilers", "formal languages");

        assert_eq!(
            graph.prerequisites(&"compilers"),
            &["data structures", "formal languages"]
        );
        assert!(graph.contains_key(&"compilers"));
        // Prerequisites are not keys until they get a list of their own.
        assert!(!graph.contains_key(&"data structures"));
    }

    #[test]
    fn test_leaf_has_no_prerequisites() {
        let graph = DependencyGraph::from([("a", vec!["b"])]);
        assert!(graph.prerequisites(&"b").is_empty());
        assert!(graph.prerequisites(&"missing").is_empty());
    }

    #[test]
    fn test_nodes_first_seen_order() {
        let graph = DependencyGraph::from([
            ("a", vec!["b", "c"]),
            ("b", vec!["d"]),
            ("c", vec!["d", "b"]),
        ]);
        assert_eq!(graph.nodes(), vec![&"a", &"b", &"c", &"d"]);
    }

    #[test]
    fn test_edges() {
        let graph = DependencyGraph::from([("a", vec!["b", "b"]), ("b", vec![])]);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(&"a", &"b"), (&"a", &"b")]);
    }

    #[test]
    fn test_empty_graph() {
        let graph: DependencyGraph<String> = DependencyGraph::new();
        assert!(graph.is_empty());
        assert!(graph.nodes().is_empty());
        assert_eq!(graph.edges().count(), 0);
    }

    #[test]
    fn test_would_create_cycle_found() {
        // b depends on a, c depends on b
        let graph = DependencyGraph::from([("b", vec!["a"]), ("c", vec!["b"])]);

        // a depending on c closes a -> c -> b -> a
        let cycle = graph.would_create_cycle(&"a", &"c");
        assert_eq!(cycle, Some(vec!["a", "c", "b", "a"]));
    }

    #[test]
    fn test_would_create_cycle_none() {
        let graph = DependencyGraph::from([("b", vec!["a"]), ("c", vec!["b"])]);
        assert!(graph.would_create_cycle(&"d", &"c").is_none());
        // Reverse direction of an existing edge chain is fine
        assert!(graph.would_create_cycle(&"c", &"a").is_none());
    }

    #[test]
    fn test_would_create_cycle_self() {
        let graph: DependencyGraph<&str> = DependencyGraph::new();
        assert_eq!(graph.would_create_cycle(&"a", &"a"), Some(vec!["a", "a"]));
    }

    #[test]
    fn test_would_create_cycle_diamond() {
        let graph = DependencyGraph::from([("c", vec!["a", "b"]), ("d", vec!["a", "b"])]);
        assert_eq!(graph.would_create_cycle(&"a", &"d"), Some(vec!["a", "d", "a"]));
        assert!(graph.would_create_cycle(&"d", &"c").is_none());
    }

    #[test]
    fn test_from_btree_map_sorted_keys() {
        let map = BTreeMap::from([("z", vec![]), ("m", vec!["z"]), ("a", vec!["m"])]);
        let graph = DependencyGraph::from(map);
        assert_eq!(graph.keys().copied().collect::<Vec<_>>(), vec!["a", "m", "z"]);
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let json = r#"{"networks": ["operating systems"], "algorithms": ["data structures"], "calculus": []}"#;
        let graph: DependencyGraph<String> = serde_json::from_str(json).unwrap();

        let keys: Vec<_> = graph.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["networks", "algorithms", "calculus"]);
        assert_eq!(
            graph.prerequisites(&"networks".to_string()),
            &["operating systems".to_string()]
        );
    }

    #[test]
    fn test_serialize() {
        let graph = DependencyGraph::from([("b", vec!["a"]), ("a", vec![])]);
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json, r#"{"b":["a"],"a":[]}"#);
    }

    #[test]
    fn test_deserialize_rejects_non_map() {
        let result: std::result::Result<DependencyGraph<String>, _> =
            serde_json::from_str(r#"["a", "b"]"#);
        assert!(result.is_err());
    }
}
