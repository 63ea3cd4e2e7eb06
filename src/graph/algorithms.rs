//! Graph algorithms for analysis

use crate::error::{GraphError, Result};
use crate::graph::centrality::degree_centrality;
use crate::graph::{ensure_nonempty, SocialGraph};
use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeSet, VecDeque};

/// Attribute consulted for edge weights
pub const WEIGHT_ATTRIBUTE: &str = "weight";

/// Return every node whose degree is at least `min_degree`
pub fn highlight_nodes(graph: &SocialGraph, min_degree: usize) -> Result<BTreeSet<String>> {
    ensure_nonempty(graph)?;

    let highlighted: BTreeSet<String> = graph
        .nodes()
        .filter(|&node| graph.degree(node) >= min_degree)
        .map(|node| graph.label(node).to_string())
        .collect();

    log::debug!(
        "{} of {} nodes have degree >= {}",
        highlighted.len(),
        graph.node_count(),
        min_degree
    );

    Ok(highlighted)
}

/// Nodes whose degree centrality reaches `ratio` times the maximum
pub fn high_centrality_nodes(graph: &SocialGraph, ratio: f64) -> Result<BTreeSet<String>> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(GraphError::InvalidArgument(format!(
            "centrality ratio must lie in [0, 1], got {}",
            ratio
        )));
    }

    let scores = degree_centrality(graph)?;
    let max = scores.values().copied().fold(0.0_f64, f64::max);
    let threshold = max * ratio;

    Ok(scores
        .into_iter()
        .filter(|(_, score)| *score >= threshold)
        .map(|(label, _)| label)
        .collect())
}

/// Breadth-first traversal order from `start`.
///
/// Neighbours are expanded in insertion order; unreachable nodes are omitted.
pub fn bfs_order(graph: &SocialGraph, start: &str) -> Result<Vec<String>> {
    ensure_nonempty(graph)?;
    let source = graph
        .index_of(start)
        .ok_or_else(|| GraphError::NodeNotFound(start.to_string()))?;

    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();
    let mut order = Vec::new();

    visited[source as usize] = true;
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        order.push(graph.label(node).to_string());
        for &next in graph.neighbors(node) {
            if !visited[next as usize] {
                visited[next as usize] = true;
                queue.push_back(next);
            }
        }
    }

    Ok(order)
}

/// Hop distances from `source`; `-1` marks unreachable nodes.
///
/// `dist` and `queue` are caller-owned so repeated runs can reuse them.
pub(crate) fn bfs_distances(
    graph: &SocialGraph,
    source: u32,
    dist: &mut Vec<i64>,
    queue: &mut VecDeque<u32>,
) {
    dist.clear();
    dist.resize(graph.node_count(), -1);
    queue.clear();

    dist[source as usize] = 0;
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        let next_dist = dist[node as usize] + 1;
        for &next in graph.neighbors(node) {
            if dist[next as usize] < 0 {
                dist[next as usize] = next_dist;
                queue.push_back(next);
            }
        }
    }
}

/// Connected components as lists of node indices, ordered by lowest index
pub fn connected_components(graph: &SocialGraph) -> Vec<Vec<u32>> {
    let mut seen = vec![false; graph.node_count()];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for root in graph.nodes() {
        if seen[root as usize] {
            continue;
        }
        seen[root as usize] = true;
        queue.push_back(root);

        let mut members = Vec::new();
        while let Some(node) = queue.pop_front() {
            members.push(node);
            for &next in graph.neighbors(node) {
                if !seen[next as usize] {
                    seen[next as usize] = true;
                    queue.push_back(next);
                }
            }
        }
        members.sort_unstable();
        components.push(members);
    }

    components
}

/// One edge of a spanning forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Minimum spanning forest over the `weight` attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanningForest {
    pub edges: Vec<ForestEdge>,
    pub total_weight: f64,
}

fn edge_weight(graph: &SocialGraph, source: u32, target: u32) -> Result<f64> {
    let raw = match graph
        .edge_attributes(source, target)
        .and_then(|attrs| attrs.get(WEIGHT_ATTRIBUTE))
    {
        Some(raw) => raw,
        None => return Ok(1.0),
    };

    match raw.trim().parse::<f64>() {
        Ok(weight) if weight.is_finite() => Ok(weight),
        _ => Err(GraphError::InvalidWeight {
            source_label: graph.label(source).to_string(),
            target_label: graph.label(target).to_string(),
            value: raw.clone(),
        }),
    }
}

/// Minimum spanning tree (a forest when the graph is disconnected).
///
/// Edges without a `weight` attribute weigh 1.0. Self-loops never take part.
pub fn minimum_spanning_tree(graph: &SocialGraph) -> Result<SpanningForest> {
    ensure_nonempty(graph)?;

    let mut weighted = UnGraph::<u32, f64>::with_capacity(graph.node_count(), graph.edge_count());
    for node in graph.nodes() {
        weighted.add_node(node);
    }
    for edge in graph.edges().iter().filter(|e| !e.is_self_loop()) {
        let weight = edge_weight(graph, edge.source, edge.target)?;
        weighted.add_edge(
            NodeIndex::new(edge.source as usize),
            NodeIndex::new(edge.target as usize),
            weight,
        );
    }

    let mut edges = Vec::new();
    for element in min_spanning_tree(&weighted) {
        if let Element::Edge {
            source,
            target,
            weight,
        } = element
        {
            edges.push(ForestEdge {
                source: graph.label(source as u32).to_string(),
                target: graph.label(target as u32).to_string(),
                weight,
            });
        }
    }

    let total_weight = edges.iter().map(|e| e.weight).sum();
    log::info!(
        "Spanning forest has {} edges with total weight {}",
        edges.len(),
        total_weight
    );

    Ok(SpanningForest {
        edges,
        total_weight,
    })
}

/// Headline statistics of a loaded graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub mean_degree: f64,
    pub degree_std_dev: f64,
    pub max_degree: usize,
    pub component_count: usize,
}

pub fn summary(graph: &SocialGraph) -> Result<GraphSummary> {
    ensure_nonempty(graph)?;

    let degrees: Vec<f64> = graph.nodes().map(|n| graph.degree(n) as f64).collect();
    let max_degree = graph.nodes().map(|n| graph.degree(n)).fold(0, usize::max);

    Ok(GraphSummary {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        mean_degree: degrees.iter().mean(),
        degree_std_dev: degrees.iter().population_std_dev(),
        max_degree,
        component_count: connected_components(graph).len(),
    })
}
