//! In-memory undirected social graph

use std::collections::{BTreeMap, HashMap};

/// Edge attributes, e.g. `weight=2`
pub type Attributes = BTreeMap<String, String>;

/// A single undirected edge between two node indices
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: u32,
    pub target: u32,
    pub attributes: Attributes,
}

impl Edge {
    /// Whether both endpoints are the same node
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Undirected graph in compressed adjacency form.
///
/// Nodes are numbered in first-seen order. `offsets[i]..offsets[i+1]` is the
/// range of `adjacency` holding node `i`'s neighbours, kept in the order the
/// edges were first inserted. A self-loop appears once in its node's
/// neighbour list but counts twice towards its degree.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    pub(crate) offsets: Vec<u32>,
    pub(crate) adjacency: Vec<u32>,
    pub(crate) degrees: Vec<u32>,
    pub(crate) node_ids: Vec<String>,
    pub(crate) id_to_index: HashMap<String, u32>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) edge_index: HashMap<(u32, u32), usize>,
}

pub(crate) fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl SocialGraph {
    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of distinct edges (self-loops included)
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Label of a node index
    pub fn label(&self, node: u32) -> &str {
        &self.node_ids[node as usize]
    }

    /// All labels in index order
    pub fn labels(&self) -> &[String] {
        &self.node_ids
    }

    /// Look up a node index by label
    pub fn index_of(&self, label: &str) -> Option<u32> {
        self.id_to_index.get(label).copied()
    }

    /// Neighbours of a node in insertion order
    pub fn neighbors(&self, node: u32) -> &[u32] {
        let start = self.offsets[node as usize] as usize;
        let end = self.offsets[node as usize + 1] as usize;
        &self.adjacency[start..end]
    }

    /// Incident-edge count; a self-loop counts twice
    pub fn degree(&self, node: u32) -> usize {
        self.degrees[node as usize] as usize
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Attributes of the edge between two nodes, if there is one
    pub fn edge_attributes(&self, a: u32, b: u32) -> Option<&Attributes> {
        self.edge_index
            .get(&edge_key(a, b))
            .map(|&idx| &self.edges[idx].attributes)
    }

    /// Same as [`SocialGraph::edge_attributes`] but addressed by label
    pub fn edge_attributes_by_label(&self, a: &str, b: &str) -> Option<&Attributes> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.edge_attributes(a, b)
    }

    /// Node indices `0..node_count`
    pub fn nodes(&self) -> impl Iterator<Item = u32> {
        0..self.node_ids.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::GraphBuilder;

    #[test]
    fn self_loop_counts_twice() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("a", "a", Default::default());
        builder.add_edge("a", "b", Default::default());
        let graph = builder.build();

        let a = graph.index_of("a").unwrap();
        assert_eq!(graph.degree(a), 3);
        assert_eq!(graph.neighbors(a).len(), 2);
        assert!(graph.edges()[0].is_self_loop());
    }

    #[test]
    fn edge_lookup_is_orientation_free() {
        let mut builder = GraphBuilder::new();
        builder.add_edge(
            "x",
            "y",
            [("weight".to_string(), "3".to_string())].into_iter().collect(),
        );
        let graph = builder.build();

        let attrs = graph.edge_attributes_by_label("y", "x").unwrap();
        assert_eq!(attrs.get("weight").map(String::as_str), Some("3"));
        assert!(graph.edge_attributes_by_label("x", "z").is_none());
    }
}
