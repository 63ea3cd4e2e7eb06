//! Core library functions for the social network analyzer

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod query;
pub mod session;
pub mod storage;
pub mod structures;
pub mod viz;

pub use error::{GraphError, Result};
pub use graph::SocialGraph;
pub use query::{run_query, Query, QueryKind, QueryResult};
pub use session::{Highlight, Session};
