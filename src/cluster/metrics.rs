//! Community statistics and metrics

use crate::cluster::Community;
use crate::graph::SocialGraph;
use std::collections::HashSet;

/// Calculate density (internal edges / potential edges) of a node group.
///
/// Self-loops are not counted. By convention a singleton has density 1.
pub fn density(graph: &SocialGraph, members: &[u32]) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 1.0;
    }

    let member_set: HashSet<u32> = members.iter().copied().collect();
    let internal = graph
        .edges()
        .iter()
        .filter(|e| !e.is_self_loop())
        .filter(|e| member_set.contains(&e.source) && member_set.contains(&e.target))
        .count();

    let potential = n * (n - 1) / 2;
    internal as f64 / potential as f64
}

/// Newman modularity of a partition: `sum_c [ L_c / m - (d_c / 2m)^2 ]`.
///
/// `L_c` counts edges inside community `c` and `d_c` is its total degree.
/// Labels not present in the graph are ignored. A graph without edges has
/// modularity 0.
pub fn modularity(graph: &SocialGraph, communities: &[Community]) -> f64 {
    let m = graph.edge_count() as f64;
    if m == 0.0 {
        return 0.0;
    }

    let mut membership = vec![usize::MAX; graph.node_count()];
    for (idx, community) in communities.iter().enumerate() {
        for label in &community.members {
            if let Some(node) = graph.index_of(label) {
                membership[node as usize] = idx;
            }
        }
    }

    let mut internal = vec![0.0; communities.len()];
    let mut degree_sum = vec![0.0; communities.len()];

    for edge in graph.edges() {
        let c = membership[edge.source as usize];
        if c != usize::MAX && c == membership[edge.target as usize] {
            internal[c] += 1.0;
        }
    }
    for node in graph.nodes() {
        let c = membership[node as usize];
        if c != usize::MAX {
            degree_sum[c] += graph.degree(node) as f64;
        }
    }

    internal
        .iter()
        .zip(&degree_sum)
        .map(|(l, d)| l / m - (d / (2.0 * m)).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::into_communities;
    use crate::graph::{Attributes, GraphBuilder};

    fn two_triangles() -> SocialGraph {
        let mut builder = GraphBuilder::new();
        for (a, b) in [("1", "2"), ("2", "3"), ("1", "3"), ("4", "5"), ("5", "6"), ("4", "6")] {
            builder.add_edge(a, b, Attributes::new());
        }
        builder.build()
    }

    #[test]
    fn density_of_clique_and_path() {
        let graph = two_triangles();
        assert_eq!(density(&graph, &[0, 1, 2]), 1.0);
        assert_eq!(density(&graph, &[0]), 1.0);
        // two triangle nodes plus one from the other side: 1 edge of 3
        assert!((density(&graph, &[0, 1, 3]) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn modularity_of_natural_split() {
        let graph = two_triangles();
        let split = into_communities(&graph, vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert!((modularity(&graph, &split) - 0.5).abs() < 1e-12);

        let whole = into_communities(&graph, vec![vec![0, 1, 2, 3, 4, 5]]);
        assert!(modularity(&graph, &whole).abs() < 1e-12);
    }
}
