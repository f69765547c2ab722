//! Relational Query Service
//!
//! Parameterized lookups and aggregations against the normalized
//! faculty / publication / authorship schema in Postgres, plus the
//! persisted favorites subset. All statements run over a shared
//! connection pool; the year scope for title searches is an explicit
//! parameter on every call, never server-side state.

mod pool;
mod repository;

pub use pool::DbPool;
pub use repository::{RelationalQueries, RelationalStore};
