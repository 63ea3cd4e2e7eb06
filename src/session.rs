//! Caller-owned analysis state: the loaded graph and what is highlighted

use crate::cluster::Community;
use crate::config::Config;
use crate::data::{load_graph, InputFormat};
use crate::error::{GraphError, Result};
use crate::graph::SocialGraph;
use crate::query::{run_query, Query, QueryResult};
use crate::viz::{circular_layout, export_graphml, LayoutIndex};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// What the presentation layer should emphasise
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Highlight {
    #[default]
    None,

    /// A set of nodes drawn in the highlight colour
    Nodes(BTreeSet<String>),

    /// Cluster colouring: label -> palette index
    Clusters(BTreeMap<String, usize>),
}

impl Highlight {
    /// Colour every member of each community with its community's index
    pub fn from_communities(communities: &[Community]) -> Self {
        let colours = communities
            .iter()
            .enumerate()
            .flat_map(|(idx, c)| c.members.iter().map(move |label| (label.clone(), idx)))
            .collect();
        Highlight::Clusters(colours)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Highlight::None)
    }
}

/// A loaded graph plus its highlight state.
///
/// A failed load leaves both the previous graph and its highlight in place.
#[derive(Debug, Default)]
pub struct Session {
    graph: Option<SocialGraph>,
    highlight: Highlight,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            graph: None,
            highlight: Highlight::None,
            config,
        }
    }

    pub fn graph(&self) -> Option<&SocialGraph> {
        self.graph.as_ref()
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    /// Load a graph, inferring the format from the file extension
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&SocialGraph> {
        self.load_with(path, None)
    }

    /// Load a graph in an explicit format (or inferred when `None`)
    pub fn load_with(
        &mut self,
        path: impl AsRef<Path>,
        format: Option<InputFormat>,
    ) -> Result<&SocialGraph> {
        let path = path.as_ref();
        match load_graph(path, format, self.config.load_policy) {
            Ok(graph) => {
                self.highlight = Highlight::None;
                Ok(&*self.graph.insert(graph))
            }
            Err(err) => {
                log::warn!(
                    "Failed to load {}: {}; keeping the previous graph",
                    path.display(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Run a query against the loaded graph and update the highlight from its result
    pub fn run(&mut self, query: &Query) -> Result<QueryResult> {
        let graph = self.graph.as_ref().ok_or(GraphError::EmptyGraph)?;
        let result = run_query(graph, query)?;

        match (query, &result) {
            (
                Query::HighlightNodes { .. } | Query::HighCentrality { .. },
                QueryResult::NodeSet(nodes),
            ) => {
                self.highlight = Highlight::Nodes(nodes.clone());
            }
            (
                Query::IdentifyClusters | Query::GirvanNewman,
                QueryResult::Communities(communities),
            ) => {
                self.highlight = Highlight::from_communities(communities);
            }
            _ => {}
        }

        Ok(result)
    }

    /// Circular layout of the current graph, indexed for hit-testing
    pub fn layout_index(&self) -> Result<LayoutIndex> {
        let graph = self.graph.as_ref().ok_or(GraphError::EmptyGraph)?;
        LayoutIndex::new(circular_layout(graph), self.config.layout_cell_size)
    }

    /// Export the current graph with the current highlight as GraphML
    pub fn render(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let graph = self.graph.as_ref().ok_or(GraphError::EmptyGraph)?;
        export_graphml(graph, &self.highlight, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_need_a_graph() {
        let mut session = Session::default();
        assert!(matches!(
            session.run(&Query::Summary),
            Err(GraphError::EmptyGraph)
        ));
        assert!(session.graph().is_none());
        assert!(session.highlight().is_none());
    }

    #[test]
    fn clusters_map_to_palette_indices() {
        let communities = vec![
            Community {
                id: 0,
                members: vec!["a".into(), "b".into()],
                size: 2,
                density: 1.0,
            },
            Community {
                id: 1,
                members: vec!["c".into()],
                size: 1,
                density: 1.0,
            },
        ];
        let Highlight::Clusters(colours) = Highlight::from_communities(&communities) else {
            panic!("expected cluster highlight");
        };
        assert_eq!(colours["a"], 0);
        assert_eq!(colours["b"], 0);
        assert_eq!(colours["c"], 1);
    }
}
