//! Graph construction module

use crate::graph::network::{edge_key, Attributes, Edge, SocialGraph};
use std::collections::HashMap;

/// Builder for incrementally constructing a SocialGraph
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Mapping from string labels to node indices
    id_to_index: HashMap<String, u32>,

    /// Node labels in first-seen order
    node_ids: Vec<String>,

    /// Adjacency lists for each node, in edge insertion order
    adjacency_lists: Vec<Vec<u32>>,

    /// Distinct edges in insertion order
    edges: Vec<Edge>,

    /// Position of each edge in `edges`, keyed by its ordered endpoint pair
    edge_index: HashMap<(u32, u32), usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a node index for the given label
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency_lists.push(Vec::new());

        idx
    }

    /// Add an undirected edge.
    ///
    /// A repeated edge (in either orientation) is merged into the existing one:
    /// its attributes are updated key by key with the new values.
    pub fn add_edge(&mut self, src_id: &str, dst_id: &str, attributes: Attributes) {
        let src_idx = self.get_or_create_node(src_id);
        let dst_idx = self.get_or_create_node(dst_id);
        let key = edge_key(src_idx, dst_idx);

        if let Some(&existing) = self.edge_index.get(&key) {
            self.edges[existing].attributes.extend(attributes);
            return;
        }

        self.edge_index.insert(key, self.edges.len());
        self.edges.push(Edge {
            source: src_idx,
            target: dst_idx,
            attributes,
        });

        self.adjacency_lists[src_idx as usize].push(dst_idx);
        if src_idx != dst_idx {
            self.adjacency_lists[dst_idx as usize].push(src_idx);
        }
    }

    /// Build the compressed graph
    pub fn build(self) -> SocialGraph {
        let node_count = self.node_ids.len();
        let edge_slots: usize = self.adjacency_lists.iter().map(Vec::len).sum();

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut adjacency = Vec::with_capacity(edge_slots);
        let mut degrees = Vec::with_capacity(node_count);

        offsets.push(0);
        for (node, list) in self.adjacency_lists.iter().enumerate() {
            adjacency.extend_from_slice(list);
            offsets.push(adjacency.len() as u32);

            let loops = list.iter().filter(|&&n| n as usize == node).count();
            degrees.push((list.len() + loops) as u32);
        }

        log::debug!(
            "Built graph with {} nodes and {} edges",
            node_count,
            self.edges.len()
        );

        SocialGraph {
            offsets,
            adjacency,
            degrees,
            node_ids: self.node_ids,
            id_to_index: self.id_to_index,
            edges: self.edges,
            edge_index: self.edge_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn duplicate_edges_merge_attributes() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("a", "b", attrs(&[("weight", "1"), ("kind", "friend")]));
        builder.add_edge("b", "a", attrs(&[("weight", "5")]));
        let graph = builder.build();

        assert_eq!(graph.edge_count(), 1);
        let merged = graph.edge_attributes_by_label("a", "b").unwrap();
        assert_eq!(merged, &attrs(&[("weight", "5"), ("kind", "friend")]));
        assert_eq!(graph.degree(0), 1);
    }

    #[test]
    fn neighbours_keep_insertion_order() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("hub", "c", Attributes::new());
        builder.add_edge("hub", "a", Attributes::new());
        builder.add_edge("b", "hub", Attributes::new());
        let graph = builder.build();

        let hub = graph.index_of("hub").unwrap();
        let order: Vec<&str> = graph.neighbors(hub).iter().map(|&n| graph.label(n)).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }
}
