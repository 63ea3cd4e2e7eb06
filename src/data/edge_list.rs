//! Whitespace-delimited edge list parsing
//!
//! One edge per line: `NODE1 NODE2 [KEY=VALUE ...]`.

use crate::config::LoadPolicy;
use crate::error::{GraphError, Result};
use crate::graph::{Attributes, GraphBuilder, SocialGraph};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A parsed line
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub attributes: Attributes,
}

/// Parse one line. Fewer than two tokens, blank lines included, is a parse error.
pub fn parse_line(line: &str, line_no: usize) -> Result<EdgeRecord> {
    let mut tokens = line.split_whitespace();

    let (source, target) = match (tokens.next(), tokens.next()) {
        (Some(source), Some(target)) => (source, target),
        (Some(source), None) => {
            return Err(GraphError::parse(
                line_no,
                format!("expected two node labels, found `{}`", source),
            ))
        }
        _ => return Err(GraphError::parse(line_no, "blank line")),
    };

    let mut attributes = Attributes::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                attributes.insert(key.to_string(), value.to_string());
            }
            _ => {
                return Err(GraphError::parse(
                    line_no,
                    format!("attribute `{}` is not of the form key=value", token),
                ))
            }
        }
    }

    Ok(EdgeRecord {
        source: source.to_string(),
        target: target.to_string(),
        attributes,
    })
}

/// Build a graph from any buffered reader
pub fn parse_edge_list<R: BufRead>(reader: R, policy: LoadPolicy) -> Result<SocialGraph> {
    let mut builder = GraphBuilder::new();
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        match parse_line(&line, line_no) {
            Ok(record) => builder.add_edge(&record.source, &record.target, record.attributes),
            Err(err) if policy == LoadPolicy::Lenient => {
                log::warn!("Skipping malformed line: {}", err);
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed lines", skipped);
    }

    Ok(builder.build())
}

/// Load an edge list file
pub fn load_edge_list(path: impl AsRef<Path>, policy: LoadPolicy) -> Result<SocialGraph> {
    let path = path.as_ref();
    log::info!("Reading edge list: {}", path.display());

    let file = File::open(path)?;
    let graph = parse_edge_list(BufReader::new(file), policy)?;

    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}
