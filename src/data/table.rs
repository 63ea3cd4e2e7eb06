//! CSV edge tables with `source`, `target` and optional `weight` columns

use crate::config::LoadPolicy;
use crate::error::{GraphError, Result};
use crate::graph::algorithms::WEIGHT_ATTRIBUTE;
use crate::graph::{Attributes, GraphBuilder, SocialGraph};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EdgeRow {
    source: String,
    target: String,
    #[serde(default)]
    weight: Option<String>,
}

/// Build a graph from CSV data with a header row
pub fn parse_csv<R: Read>(reader: R, policy: LoadPolicy) -> Result<SocialGraph> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut builder = GraphBuilder::new();
    let mut skipped = 0usize;

    for (idx, record) in reader.records().enumerate() {
        // header is line 1
        let line_no = idx + 2;
        let row = record
            .and_then(|record| record.deserialize::<EdgeRow>(Some(&headers)))
            .map_err(|err| csv_to_parse(err, line_no))
            .and_then(|row| validate(row, line_no));

        let row = match row {
            Ok(row) => row,
            Err(err) if policy == LoadPolicy::Lenient => {
                log::warn!("Skipping malformed record: {}", err);
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        let mut attributes = Attributes::new();
        if let Some(weight) = row.weight.filter(|w| !w.is_empty()) {
            attributes.insert(WEIGHT_ATTRIBUTE.to_string(), weight);
        }
        builder.add_edge(&row.source, &row.target, attributes);
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed records", skipped);
    }

    Ok(builder.build())
}

/// Load a CSV edge table from disk
pub fn load_csv(path: impl AsRef<Path>, policy: LoadPolicy) -> Result<SocialGraph> {
    let path = path.as_ref();
    log::info!("Reading CSV edge table: {}", path.display());

    let file = std::fs::File::open(path)?;
    let graph = parse_csv(file, policy)?;

    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}

fn validate(row: EdgeRow, line_no: usize) -> Result<EdgeRow> {
    if row.source.is_empty() || row.target.is_empty() {
        return Err(GraphError::parse(line_no, "record has an empty source or target"));
    }
    Ok(row)
}

/// Data errors become parse errors; I/O errors pass through
fn csv_to_parse(err: csv::Error, line_no: usize) -> GraphError {
    match err.kind() {
        csv::ErrorKind::Io(_) => GraphError::Csv(err),
        _ => {
            let line = err.position().map_or(line_no, |pos| pos.line() as usize);
            GraphError::parse(line, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_weighted_rows() {
        let input = "source,target,weight\nalice,bob,3\nbob,carol,\n";
        let graph = parse_csv(input.as_bytes(), LoadPolicy::Strict).unwrap();

        assert_eq!(graph.node_count(), 3);
        let ab = graph.edge_attributes_by_label("alice", "bob").unwrap();
        assert_eq!(ab.get("weight").map(String::as_str), Some("3"));
        assert!(graph.edge_attributes_by_label("bob", "carol").unwrap().is_empty());
    }

    #[test]
    fn weight_column_is_optional() {
        let input = "source,target\n1,2\n2,3\n";
        let graph = parse_csv(input.as_bytes(), LoadPolicy::Strict).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn short_record_is_a_parse_error() {
        let input = "source,target,weight\nalice\nbob,carol,1\n";
        assert!(matches!(
            parse_csv(input.as_bytes(), LoadPolicy::Strict),
            Err(GraphError::Parse { .. })
        ));

        let graph = parse_csv(input.as_bytes(), LoadPolicy::Lenient).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }
}
