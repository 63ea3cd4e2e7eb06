//! Degree and closeness centrality

use crate::error::Result;
use crate::graph::algorithms::bfs_distances;
use crate::graph::{ensure_nonempty, SocialGraph};
use std::collections::{BTreeMap, VecDeque};

/// Label -> score
pub type CentralityMap = BTreeMap<String, f64>;

/// Degree centrality: `degree / (N - 1)`.
///
/// A single-node graph scores 0 rather than dividing by zero. Scores stay
/// within `[0, 1]` only on loop-free graphs: a self-loop adds 2 to its
/// node's degree, so `A A` plus `A B` gives `A` a score of 3.
pub fn degree_centrality(graph: &SocialGraph) -> Result<CentralityMap> {
    ensure_nonempty(graph)?;

    let n = graph.node_count();
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };

    Ok(graph
        .nodes()
        .map(|node| (graph.label(node).to_string(), graph.degree(node) as f64 * scale))
        .collect())
}

/// Closeness centrality with the Wasserman-Faust correction.
///
/// For a node reaching `r` other nodes at total distance `s`, the score is
/// `(r / s) * (r / (N - 1))`. Nodes that reach nobody score 0.
pub fn closeness_centrality(graph: &SocialGraph) -> Result<CentralityMap> {
    ensure_nonempty(graph)?;

    let n = graph.node_count();
    let mut scores = CentralityMap::new();

    // Reused across sources
    let mut dist = Vec::with_capacity(n);
    let mut queue = VecDeque::with_capacity(n);

    for source in graph.nodes() {
        bfs_distances(graph, source, &mut dist, &mut queue);

        let (reached, total) = dist
            .iter()
            .filter(|&&d| d > 0)
            .fold((0usize, 0i64), |(count, sum), &d| (count + 1, sum + d));

        let score = if total > 0 && n > 1 {
            let reached = reached as f64;
            (reached / total as f64) * (reached / (n - 1) as f64)
        } else {
            0.0
        };

        scores.insert(graph.label(source).to_string(), score);
    }

    log::debug!("Computed closeness centrality for {} nodes", n);

    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::graph::{Attributes, GraphBuilder};

    fn graph_of(edges: &[(&str, &str)]) -> SocialGraph {
        let mut builder = GraphBuilder::new();
        for (a, b) in edges {
            builder.add_edge(a, b, Attributes::new());
        }
        builder.build()
    }

    #[test]
    fn triangle_degree_centrality_is_one() {
        let graph = graph_of(&[("A", "B"), ("B", "C"), ("A", "C")]);
        let scores = degree_centrality(&graph).unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores.values().all(|&s| (s - 1.0).abs() < 1e-12));
    }

    #[test]
    fn self_loop_lifts_degree_centrality_above_one() {
        let graph = graph_of(&[("A", "A"), ("A", "B")]);
        let scores = degree_centrality(&graph).unwrap();
        assert!((scores["A"] - 3.0).abs() < 1e-12);
        assert!((scores["B"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_node_scores_zero() {
        let graph = graph_of(&[("solo", "solo")]);
        assert_eq!(degree_centrality(&graph).unwrap()["solo"], 0.0);
        assert_eq!(closeness_centrality(&graph).unwrap()["solo"], 0.0);
    }

    #[test]
    fn closeness_on_a_path() {
        // a - b - c
        let graph = graph_of(&[("a", "b"), ("b", "c")]);
        let scores = closeness_centrality(&graph).unwrap();
        assert!((scores["b"] - 1.0).abs() < 1e-12);
        assert!((scores["a"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((scores["c"] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn closeness_penalises_disconnection() {
        // a - b plus c - d: each reaches 1 of 3 others at distance 1
        let graph = graph_of(&[("a", "b"), ("c", "d")]);
        let scores = closeness_centrality(&graph).unwrap();
        for score in scores.values() {
            assert!((score - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_graph_is_an_error() {
        let graph = GraphBuilder::new().build();
        assert!(matches!(degree_centrality(&graph), Err(GraphError::EmptyGraph)));
        assert!(matches!(closeness_centrality(&graph), Err(GraphError::EmptyGraph)));
    }
}
