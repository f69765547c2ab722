//! Graph Query Service
//!
//! Pattern-matching traversals against the faculty-institute-publication
//! graph: affiliation head-count ratios and co-authorship edges. Node
//! labels are `FACULTY`, `INSTITUTE`, `PUBLICATION`; edge types are
//! `AFFILIATION_WITH` and `PUBLISH`. Publications are traversal
//! midpoints only; no publication properties are read.

mod client;
mod queries;

pub use client::GraphClient;
pub use queries::{compute_ratio, dedup_nodes, GraphQueries, GraphStore};
