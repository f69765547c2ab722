//! Document Aggregation Service
//!
//! Pipeline-style aggregations against the denormalized faculty /
//! publication collections: counts, grouped keyword frequencies, and
//! the weighted keyword-relevance (KRC) ranking. Every operation is a
//! denormalize-then-group pipeline; stage order is part of the contract
//! and pinned by the pipeline-builder unit tests.

mod analytics;
mod pipelines;

pub use analytics::{DocumentAnalytics, DocumentStore};
