//! Results persistence module

use crate::graph::SocialGraph;
use crate::query::{QueryKind, QueryResult};
use anyhow::Result;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save a query result, with the graph's headline numbers, as pretty JSON
pub fn save_result(
    kind: QueryKind,
    result: &QueryResult,
    graph: &SocialGraph,
    path: &Path,
) -> Result<()> {
    log::info!("Saving {:?} result to {}", kind, path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let document = json!({
        "query": kind,
        "graph_stats": {
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
        },
        "output": result,
    });

    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&document)?.as_bytes())?;

    Ok(())
}

/// Read back a result written by [`save_result`]
pub fn load_result(path: &Path) -> Result<QueryResult> {
    let text = fs::read_to_string(path)?;
    let mut document: serde_json::Value = serde_json::from_str(&text)?;
    let output = document
        .get_mut("output")
        .map(serde_json::Value::take)
        .ok_or_else(|| anyhow::anyhow!("{} has no `output` field", path.display()))?;
    Ok(serde_json::from_value(output)?)
}
