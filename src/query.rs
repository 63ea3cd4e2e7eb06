//! Query dispatch over a loaded graph
//!
//! Every query is read-only and independent of the others. [`Query`] carries
//! the parameters, [`QueryKind`] is the bare tag used on the command line.

use crate::cluster::detection::{girvan_newman_split, identify_clusters};
use crate::cluster::Community;
use crate::config::Config;
use crate::error::{GraphError, Result};
use crate::graph::algorithms::{
    bfs_order, high_centrality_nodes, highlight_nodes, minimum_spanning_tree, summary,
    GraphSummary, SpanningForest,
};
use crate::graph::centrality::{closeness_centrality, degree_centrality, CentralityMap};
use crate::graph::{ensure_nonempty, SocialGraph};
use crate::structures::BinarySearchTree;
use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Query kinds selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum QueryKind {
    IdentifyClusters,
    HighlightNodes,
    HighCentrality,
    Bfs,
    DegreeCentrality,
    ClosenessCentrality,
    GirvanNewman,
    SpanningTree,
    BstInOrder,
    BstSearch,
    Summary,
}

/// A query with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    IdentifyClusters,
    HighlightNodes { min_degree: usize },
    HighCentrality { ratio: f64 },
    /// `None` starts from the first node of the graph
    Bfs { start: Option<String> },
    DegreeCentrality,
    ClosenessCentrality,
    GirvanNewman,
    SpanningTree,
    BstInOrder,
    BstSearch { target: String },
    Summary,
}

impl Query {
    /// Fill in a query's parameters from the configuration and the optional
    /// start node / search target
    pub fn build(
        kind: QueryKind,
        config: &Config,
        start: Option<String>,
        target: Option<String>,
    ) -> Result<Self> {
        Ok(match kind {
            QueryKind::IdentifyClusters => Query::IdentifyClusters,
            QueryKind::HighlightNodes => Query::HighlightNodes {
                min_degree: config.min_degree,
            },
            QueryKind::HighCentrality => Query::HighCentrality {
                ratio: config.centrality_ratio,
            },
            QueryKind::Bfs => Query::Bfs { start },
            QueryKind::DegreeCentrality => Query::DegreeCentrality,
            QueryKind::ClosenessCentrality => Query::ClosenessCentrality,
            QueryKind::GirvanNewman => Query::GirvanNewman,
            QueryKind::SpanningTree => Query::SpanningTree,
            QueryKind::BstInOrder => Query::BstInOrder,
            QueryKind::BstSearch => Query::BstSearch {
                target: target.ok_or_else(|| {
                    GraphError::InvalidArgument("bst-search needs a target value".to_string())
                })?,
            },
            QueryKind::Summary => Query::Summary,
        })
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Query::IdentifyClusters => QueryKind::IdentifyClusters,
            Query::HighlightNodes { .. } => QueryKind::HighlightNodes,
            Query::HighCentrality { .. } => QueryKind::HighCentrality,
            Query::Bfs { .. } => QueryKind::Bfs,
            Query::DegreeCentrality => QueryKind::DegreeCentrality,
            Query::ClosenessCentrality => QueryKind::ClosenessCentrality,
            Query::GirvanNewman => QueryKind::GirvanNewman,
            Query::SpanningTree => QueryKind::SpanningTree,
            Query::BstInOrder => QueryKind::BstInOrder,
            Query::BstSearch { .. } => QueryKind::BstSearch,
            Query::Summary => QueryKind::Summary,
        }
    }
}

/// The value a query produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum QueryResult {
    Communities(Vec<Community>),
    NodeSet(BTreeSet<String>),
    Order(Vec<String>),
    Scores(CentralityMap),
    SpanningForest(SpanningForest),
    Found { target: String, found: bool },
    Summary(GraphSummary),
}

/// Run a query against a graph
pub fn run_query(graph: &SocialGraph, query: &Query) -> Result<QueryResult> {
    log::debug!("Running query {:?}", query);

    Ok(match query {
        Query::IdentifyClusters => QueryResult::Communities(identify_clusters(graph)?),
        Query::HighlightNodes { min_degree } => {
            QueryResult::NodeSet(highlight_nodes(graph, *min_degree)?)
        }
        Query::HighCentrality { ratio } => QueryResult::NodeSet(high_centrality_nodes(graph, *ratio)?),
        Query::Bfs { start } => {
            ensure_nonempty(graph)?;
            let start = start.as_deref().unwrap_or_else(|| graph.label(0));
            QueryResult::Order(bfs_order(graph, start)?)
        }
        Query::DegreeCentrality => QueryResult::Scores(degree_centrality(graph)?),
        Query::ClosenessCentrality => QueryResult::Scores(closeness_centrality(graph)?),
        Query::GirvanNewman => QueryResult::Communities(girvan_newman_split(graph)?),
        Query::SpanningTree => QueryResult::SpanningForest(minimum_spanning_tree(graph)?),
        Query::BstInOrder => QueryResult::Order(bst_in_order(graph)?),
        Query::BstSearch { target } => QueryResult::Found {
            target: target.clone(),
            found: bst_search(graph, target)?,
        },
        Query::Summary => QueryResult::Summary(summary(graph)?),
    })
}

/// In-order traversal of a search tree built from the node labels
pub fn bst_in_order(graph: &SocialGraph) -> Result<Vec<String>> {
    ensure_nonempty(graph)?;
    let tree: BinarySearchTree<&str> = graph.labels().iter().map(String::as_str).collect();
    Ok(tree.in_order().into_iter().map(|label| label.to_string()).collect())
}

fn parse_int(label: &str) -> Result<i64> {
    label
        .trim()
        .parse::<i64>()
        .map_err(|_| GraphError::InvalidLabel(label.to_string()))
}

/// Search the node labels, compared as integers, for `target`
pub fn bst_search(graph: &SocialGraph, target: &str) -> Result<bool> {
    ensure_nonempty(graph)?;
    let target = parse_int(target)?;
    let tree = graph
        .labels()
        .iter()
        .map(|label| parse_int(label))
        .collect::<Result<BinarySearchTree<i64>>>()?;
    Ok(tree.contains(&target))
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Communities(communities) => {
                writeln!(f, "Clusters: {}", communities.len())?;
                for c in communities {
                    writeln!(
                        f,
                        "  #{} ({} nodes, density {:.4}): {}",
                        c.id,
                        c.size,
                        c.density,
                        c.members.iter().join(", ")
                    )?;
                }
                Ok(())
            }
            QueryResult::NodeSet(nodes) => {
                writeln!(f, "Highlighted nodes ({}): {}", nodes.len(), nodes.iter().join(", "))
            }
            QueryResult::Order(order) => writeln!(f, "Order: {}", order.iter().join(" -> ")),
            QueryResult::Scores(scores) => {
                let ranked = scores
                    .iter()
                    .sorted_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
                for (label, score) in ranked {
                    writeln!(f, "{}\t{:.6}", label, score)?;
                }
                Ok(())
            }
            QueryResult::SpanningForest(forest) => {
                writeln!(
                    f,
                    "Spanning forest: {} edges, total weight {}",
                    forest.edges.len(),
                    forest.total_weight
                )?;
                for edge in &forest.edges {
                    writeln!(f, "  {} -- {} ({})", edge.source, edge.target, edge.weight)?;
                }
                Ok(())
            }
            QueryResult::Found { target, found } => writeln!(f, "Node {} found: {}", target, found),
            QueryResult::Summary(s) => {
                writeln!(f, "Nodes: {}", s.node_count)?;
                writeln!(f, "Edges: {}", s.edge_count)?;
                writeln!(f, "Mean degree: {:.4}", s.mean_degree)?;
                writeln!(f, "Degree std dev: {:.4}", s.degree_std_dev)?;
                writeln!(f, "Max degree: {}", s.max_degree)?;
                writeln!(f, "Components: {}", s.component_count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadPolicy;
    use crate::data::edge_list::parse_edge_list;

    fn load(text: &str) -> SocialGraph {
        parse_edge_list(text.as_bytes(), LoadPolicy::Strict).unwrap()
    }

    #[test]
    fn build_fills_parameters_from_config() {
        let config = Config::default();
        assert_eq!(
            Query::build(QueryKind::HighlightNodes, &config, None, None).unwrap(),
            Query::HighlightNodes { min_degree: 50 }
        );
        assert!(Query::build(QueryKind::BstSearch, &config, None, None).is_err());
        let query = Query::build(QueryKind::Bfs, &config, Some("x".into()), None).unwrap();
        assert_eq!(query.kind(), QueryKind::Bfs);
    }

    #[test]
    fn bfs_defaults_to_first_node() {
        let graph = load("b a\na c\n");
        let result = run_query(&graph, &Query::Bfs { start: None }).unwrap();
        assert_eq!(result, QueryResult::Order(vec!["b".into(), "a".into(), "c".into()]));
    }

    #[test]
    fn bst_queries() {
        let graph = load("10 2\n2 33\n33 4\n");
        assert_eq!(bst_in_order(&graph).unwrap(), vec!["10", "2", "33", "4"]);
        assert!(bst_search(&graph, "33").unwrap());
        assert!(!bst_search(&graph, "5").unwrap());
        assert!(matches!(bst_search(&graph, "x"), Err(GraphError::InvalidLabel(_))));

        let named = load("alice bob\n");
        assert!(matches!(
            bst_search(&named, "1"),
            Err(GraphError::InvalidLabel(label)) if label == "alice"
        ));
    }

    #[test]
    fn results_render_and_serialize() {
        let graph = load("A B weight=1\nB C weight=2\nA C weight=1\n");
        let result = run_query(&graph, &Query::DegreeCentrality).unwrap();
        let text = result.to_string();
        assert!(text.contains("A\t1.000000"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "scores");
        assert_eq!(json["result"]["B"], 1.0);

        let found = QueryResult::Found {
            target: "7".into(),
            found: false,
        };
        assert_eq!(found.to_string(), "Node 7 found: false\n");
    }
}
