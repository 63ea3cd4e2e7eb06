//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod centrality;
pub mod network;

pub use builder::GraphBuilder;
pub use network::{Attributes, Edge, SocialGraph};

use crate::error::{GraphError, Result};

/// Fail with `EmptyGraph` when there are no nodes to query
pub(crate) fn ensure_nonempty(graph: &SocialGraph) -> Result<()> {
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }
    Ok(())
}
