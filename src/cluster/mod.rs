//! Community analysis module

pub mod detection;
pub mod metrics;

use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};

/// A community (cluster) of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Position of this community in the returned partition
    pub id: u32,

    /// Member labels, sorted
    pub members: Vec<String>,

    /// Size of the community
    pub size: usize,

    /// Density: internal edges / potential edges
    pub density: f64,
}

/// Turn groups of node indices into an ordered partition.
///
/// Communities are ordered by size (largest first), then by their smallest
/// member label, so identical input always yields identical output.
pub(crate) fn into_communities(graph: &SocialGraph, groups: Vec<Vec<u32>>) -> Vec<Community> {
    let mut communities: Vec<(Vec<String>, f64)> = groups
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|group| {
            let density = metrics::density(graph, &group);
            let mut members: Vec<String> = group
                .iter()
                .map(|&node| graph.label(node).to_string())
                .collect();
            members.sort();
            (members, density)
        })
        .collect();

    communities.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0[0].cmp(&b.0[0])));

    communities
        .into_iter()
        .enumerate()
        .map(|(id, (members, density))| Community {
            id: id as u32,
            size: members.len(),
            members,
            density,
        })
        .collect()
}
