//! ScholarLens Common Library
//!
//! Shared code for the ScholarLens services including:
//! - Domain models (faculty, publications, keywords, graph elements)
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result, StoreKind};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Publication excluded from top-cited rankings.
///
/// This record carries ~5000 authors in the source dataset, an anomalous
/// authorship cardinality flagged for quality control. The exclusion is a
/// named data rule, not an arbitrary filter; revisit with the data owner
/// before lifting it.
pub const ANOMALOUS_AUTHORSHIP_PUBLICATION_ID: i64 = 2_147_483_647;
