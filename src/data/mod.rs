//! Graph loading from flat files

pub mod edge_list;
pub mod table;

use crate::config::LoadPolicy;
use crate::error::Result;
use crate::graph::SocialGraph;
use clap::ValueEnum;
use std::path::Path;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// `NODE1 NODE2 [KEY=VALUE ...]` per line
    EdgeList,

    /// CSV with `source`, `target` and optional `weight` columns
    Csv,
}

impl InputFormat {
    /// `.csv` files are tables, anything else is an edge list
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::EdgeList,
        }
    }
}

/// Load a graph in the given format (inferred from the extension when `None`)
pub fn load_graph(
    path: impl AsRef<Path>,
    format: Option<InputFormat>,
    policy: LoadPolicy,
) -> Result<SocialGraph> {
    let path = path.as_ref();
    match format.unwrap_or_else(|| InputFormat::from_path(path)) {
        InputFormat::EdgeList => edge_list::load_edge_list(path, policy),
        InputFormat::Csv => table::load_csv(path, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("net.CSV")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("net.txt")), InputFormat::EdgeList);
        assert_eq!(InputFormat::from_path(Path::new("edges")), InputFormat::EdgeList);
    }
}
