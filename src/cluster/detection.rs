//! Community detection algorithms

use crate::cluster::metrics::modularity;
use crate::cluster::{into_communities, Community};
use crate::error::Result;
use crate::graph::{ensure_nonempty, SocialGraph};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Gains closer than this are treated as equal
const GAIN_EPSILON: f64 = 1e-12;

/// Union-Find structure for component counting
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set (for union by size)
    rank: Vec<u32>,
}

impl DisjointSets {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        if self.rank[root_x as usize] > self.rank[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
    }

    /// Group elements by root, each group sorted, groups ordered by first element
    pub fn groups(&mut self) -> Vec<Vec<u32>> {
        let mut by_root: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        let mut order = Vec::new();
        for x in 0..self.parent.len() as u32 {
            let root = self.find(x);
            let group = by_root.entry(root).or_default();
            if group.is_empty() {
                order.push(root);
            }
            group.push(x);
        }
        order
            .into_iter()
            .filter_map(|root| by_root.remove(&root))
            .collect()
    }
}

/// Working state of one community during greedy merging
struct GreedyCommunity {
    members: Vec<u32>,
    /// Smallest member label; used for tie-breaking
    representative: String,
    /// Fraction of edge ends attached to this community (a_i)
    degree_fraction: f64,
    /// Fraction of edge ends linking to each neighbouring community (e_ij)
    links: BTreeMap<usize, f64>,
}

/// Greedy modularity maximization (Clauset-Newman-Moore).
///
/// Starts from singletons and repeatedly merges the pair of connected
/// communities with the largest modularity gain until no merge gains
/// anything. Equal gains go to the pair whose representative labels come
/// first lexicographically.
pub fn identify_clusters(graph: &SocialGraph) -> Result<Vec<Community>> {
    ensure_nonempty(graph)?;
    log::info!(
        "Running greedy modularity on {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let two_m = 2.0 * graph.edge_count() as f64;
    if two_m == 0.0 {
        let singletons = graph.nodes().map(|n| vec![n]).collect();
        return Ok(into_communities(graph, singletons));
    }

    let mut communities: Vec<Option<GreedyCommunity>> = graph
        .nodes()
        .map(|node| {
            Some(GreedyCommunity {
                members: vec![node],
                representative: graph.label(node).to_string(),
                degree_fraction: graph.degree(node) as f64 / two_m,
                links: BTreeMap::new(),
            })
        })
        .collect();

    for edge in graph.edges().iter().filter(|e| !e.is_self_loop()) {
        let (u, v) = (edge.source as usize, edge.target as usize);
        for (from, to) in [(u, v), (v, u)] {
            if let Some(community) = communities[from].as_mut() {
                *community.links.entry(to).or_insert(0.0) += 1.0 / two_m;
            }
        }
    }

    let mut merges = 0usize;
    while let Some((keep, absorb)) = best_merge(&communities) {
        merge(&mut communities, keep, absorb);
        merges += 1;
    }

    let groups = communities
        .into_iter()
        .flatten()
        .map(|community| community.members)
        .collect();
    let clusters = into_communities(graph, groups);

    log::info!(
        "Greedy modularity finished after {} merges: {} communities, modularity {:.4}",
        merges,
        clusters.len(),
        modularity(graph, &clusters)
    );

    Ok(clusters)
}

/// The positive-gain merge to apply next, if any
fn best_merge(communities: &[Option<GreedyCommunity>]) -> Option<(usize, usize)> {
    let mut best: Option<(f64, usize, usize)> = None;

    for (i, community) in communities.iter().enumerate() {
        let Some(ci) = community else { continue };
        for (&j, &e_ij) in ci.links.range(i + 1..) {
            let Some(cj) = communities[j].as_ref() else { continue };
            let gain = 2.0 * (e_ij - ci.degree_fraction * cj.degree_fraction);
            if gain <= GAIN_EPSILON {
                continue;
            }

            let better = match best {
                None => true,
                Some((best_gain, bi, bj)) => {
                    if gain > best_gain + GAIN_EPSILON {
                        true
                    } else if gain + GAIN_EPSILON < best_gain {
                        false
                    } else {
                        tie_key(communities, i, j) < tie_key(communities, bi, bj)
                    }
                }
            };
            if better {
                best = Some((gain, i, j));
            }
        }
    }

    best.map(|(_, i, j)| (i, j))
}

fn tie_key(communities: &[Option<GreedyCommunity>], i: usize, j: usize) -> (&str, &str) {
    let a = communities[i].as_ref().map_or("", |c| c.representative.as_str());
    let b = communities[j].as_ref().map_or("", |c| c.representative.as_str());
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn merge(communities: &mut [Option<GreedyCommunity>], keep: usize, absorb: usize) {
    let Some(absorbed) = communities[absorb].take() else {
        return;
    };

    for (&k, &e_jk) in &absorbed.links {
        if k == keep {
            continue;
        }
        if let Some(neighbour) = communities[k].as_mut() {
            neighbour.links.remove(&absorb);
            *neighbour.links.entry(keep).or_insert(0.0) += e_jk;
        }
    }

    if let Some(kept) = communities[keep].as_mut() {
        kept.links.remove(&absorb);
        for (k, e_jk) in absorbed.links {
            if k != keep {
                *kept.links.entry(k).or_insert(0.0) += e_jk;
            }
        }
        kept.degree_fraction += absorbed.degree_fraction;
        kept.members.extend(absorbed.members);
        if absorbed.representative < kept.representative {
            kept.representative = absorbed.representative;
        }
    }
}

/// First level of the Girvan-Newman hierarchy.
///
/// Removes the edge with the highest betweenness, recomputing after every
/// removal, until the graph falls into more components than it started with.
pub fn girvan_newman_split(graph: &SocialGraph) -> Result<Vec<Community>> {
    ensure_nonempty(graph)?;

    let n = graph.node_count();
    let mut adjacency: Vec<Vec<u32>> = graph
        .nodes()
        .map(|node| {
            graph
                .neighbors(node)
                .iter()
                .copied()
                .filter(|&next| next != node)
                .collect()
        })
        .collect();

    let mut remaining: usize = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
    if remaining == 0 {
        return Ok(into_communities(graph, graph.nodes().map(|n| vec![n]).collect()));
    }

    let mut groups = component_groups(&adjacency);
    let initial = groups.len();

    while groups.len() <= initial && remaining > 0 {
        let betweenness = edge_betweenness(&adjacency);
        let Some((u, v)) = pick_max_edge(graph, &betweenness) else {
            break;
        };

        log::debug!(
            "Removing edge {} -- {} (betweenness {:.4})",
            graph.label(u),
            graph.label(v),
            betweenness[&(u, v)]
        );
        adjacency[u as usize].retain(|&x| x != v);
        adjacency[v as usize].retain(|&x| x != u);
        remaining -= 1;

        groups = component_groups(&adjacency);
    }

    log::info!(
        "Girvan-Newman split {} nodes into {} communities",
        n,
        groups.len()
    );

    Ok(into_communities(graph, groups))
}

fn component_groups(adjacency: &[Vec<u32>]) -> Vec<Vec<u32>> {
    let mut sets = DisjointSets::new(adjacency.len());
    for (node, neighbours) in adjacency.iter().enumerate() {
        for &next in neighbours {
            sets.union(node as u32, next);
        }
    }
    sets.groups()
}

/// Brandes edge betweenness on an unweighted adjacency list.
///
/// Keys are `(min, max)` endpoint pairs.
fn edge_betweenness(adjacency: &[Vec<u32>]) -> HashMap<(u32, u32), f64> {
    let n = adjacency.len();
    let mut scores: HashMap<(u32, u32), f64> = HashMap::new();
    for (u, neighbours) in adjacency.iter().enumerate() {
        for &v in neighbours {
            let u = u as u32;
            scores.insert((u.min(v), u.max(v)), 0.0);
        }
    }

    let mut stack = Vec::with_capacity(n);
    let mut queue = VecDeque::with_capacity(n);
    let mut preds: Vec<Vec<u32>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![-1_i64; n];
    let mut delta = vec![0.0_f64; n];

    for s in 0..n {
        stack.clear();
        queue.clear();
        preds.iter_mut().for_each(Vec::clear);
        sigma.iter_mut().for_each(|x| *x = 0.0);
        dist.iter_mut().for_each(|x| *x = -1);
        delta.iter_mut().for_each(|x| *x = 0.0);

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s as u32);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &adjacency[v as usize] {
                if dist[w as usize] < 0 {
                    dist[w as usize] = dist[v as usize] + 1;
                    queue.push_back(w);
                }
                if dist[w as usize] == dist[v as usize] + 1 {
                    sigma[w as usize] += sigma[v as usize];
                    preds[w as usize].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            for &v in &preds[w as usize] {
                let share = sigma[v as usize] / sigma[w as usize] * (1.0 + delta[w as usize]);
                if let Some(score) = scores.get_mut(&(v.min(w), v.max(w))) {
                    *score += share;
                }
                delta[v as usize] += share;
            }
        }
    }

    scores
}

/// Highest-betweenness edge; ties go to the lexicographically first label pair
fn pick_max_edge(graph: &SocialGraph, betweenness: &HashMap<(u32, u32), f64>) -> Option<(u32, u32)> {
    let label_pair = |&(a, b): &(u32, u32)| {
        let (la, lb) = (graph.label(a), graph.label(b));
        if la <= lb {
            (la, lb)
        } else {
            (lb, la)
        }
    };

    let mut best: Option<((u32, u32), f64)> = None;
    for (edge, &score) in betweenness {
        best = match best {
            None => Some((*edge, score)),
            Some((best_edge, best_score)) => {
                if score > best_score + GAIN_EPSILON
                    || ((score - best_score).abs() <= GAIN_EPSILON
                        && label_pair(edge) < label_pair(&best_edge))
                {
                    Some((*edge, score))
                } else {
                    Some((best_edge, best_score))
                }
            }
        };
    }

    best.map(|(edge, _)| edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Attributes, GraphBuilder};
    use std::collections::BTreeSet;

    fn graph_of(edges: &[(&str, &str)]) -> SocialGraph {
        let mut builder = GraphBuilder::new();
        for (a, b) in edges {
            builder.add_edge(a, b, Attributes::new());
        }
        builder.build()
    }

    fn barbell() -> SocialGraph {
        graph_of(&[
            ("a", "b"),
            ("b", "c"),
            ("a", "c"),
            ("c", "d"),
            ("d", "e"),
            ("e", "f"),
            ("d", "f"),
        ])
    }

    fn member_sets(communities: &[Community]) -> Vec<BTreeSet<&str>> {
        communities
            .iter()
            .map(|c| c.members.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn disjoint_sets_groups() {
        let mut sets = DisjointSets::new(5);
        sets.union(0, 3);
        sets.union(4, 1);
        assert_eq!(sets.groups(), vec![vec![0, 3], vec![1, 4], vec![2]]);
    }

    #[test]
    fn greedy_modularity_splits_barbell() {
        let clusters = identify_clusters(&barbell()).unwrap();
        let sets = member_sets(&clusters);
        assert_eq!(sets.len(), 2);
        assert!(sets.contains(&["a", "b", "c"].into_iter().collect()));
        assert!(sets.contains(&["d", "e", "f"].into_iter().collect()));
        assert_eq!(clusters[0].id, 0);
        assert_eq!(clusters[0].members, vec!["a", "b", "c"]);
    }

    #[test]
    fn greedy_modularity_is_stable() {
        let graph = barbell();
        assert_eq!(identify_clusters(&graph).unwrap(), identify_clusters(&graph).unwrap());
    }

    #[test]
    fn edgeless_graph_gives_singletons() {
        let graph = graph_of(&[("x", "x"), ("y", "y")]);
        let clusters = identify_clusters(&graph).unwrap();
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.size == 1));
    }

    #[test]
    fn disconnected_components_stay_apart() {
        let graph = graph_of(&[("a", "b"), ("c", "d")]);
        let clusters = identify_clusters(&graph).unwrap();
        let sets = member_sets(&clusters);
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn girvan_newman_cuts_the_bridge() {
        let clusters = girvan_newman_split(&barbell()).unwrap();
        let sets = member_sets(&clusters);
        assert_eq!(
            sets,
            vec![
                ["a", "b", "c"].into_iter().collect::<BTreeSet<_>>(),
                ["d", "e", "f"].into_iter().collect::<BTreeSet<_>>(),
            ]
        );
    }

    #[test]
    fn girvan_newman_on_a_path() {
        // a - b - c - d: the middle edge carries the most shortest paths
        let graph = graph_of(&[("a", "b"), ("b", "c"), ("c", "d")]);
        let clusters = girvan_newman_split(&graph).unwrap();
        let sets = member_sets(&clusters);
        assert_eq!(sets.len(), 2);
        assert!(sets.iter().all(|s| s.len() == 2));
    }
}
