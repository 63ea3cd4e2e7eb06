//! Error types for graph loading and queries

use thiserror::Error;

/// Errors raised by the loader and the query functions.
///
/// Every variant is recoverable: callers are expected to report it and keep
/// whatever state they already had.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A line (or CSV record) could not be turned into an edge
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A query referenced a node that is not in the graph
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A query was run with no graph loaded, or against a graph with no nodes
    #[error("no graph loaded (or the graph has no nodes)")]
    EmptyGraph,

    /// A label could not be coerced to an integer
    #[error("label is not an integer: {0}")]
    InvalidLabel(String),

    /// An edge carries a `weight` attribute that is not a number
    #[error("edge {source_label} -- {target_label} has a non-numeric weight: {value}")]
    InvalidWeight {
        source_label: String,
        target_label: String,
        value: String,
    },

    /// A parameter was out of its valid range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl GraphError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        GraphError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, GraphError>;
