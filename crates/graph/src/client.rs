//! Bolt connection setup for the graph store

use neo4rs::{ConfigBuilder, Graph};
use scholarlens_common::config::GraphConfig;
use scholarlens_common::errors::{AppError, Result, StoreKind};
use scholarlens_common::metrics::record_store_error;
use tracing::info;

/// Thin wrapper around neo4rs::Graph providing connection setup.
#[derive(Clone)]
pub struct GraphClient {
    pub(crate) graph: Graph,
}

impl GraphClient {
    /// Connect to the graph store with the given credentials.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        info!("Connecting to graph store...");

        let bolt_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .fetch_size(config.fetch_size)
            .max_connections(config.max_connections)
            .build()
            .map_err(graph_err)?;

        let graph = Graph::connect(bolt_config).await.map_err(graph_err)?;

        info!(database = %config.database, "Graph store connection established");

        Ok(Self { graph })
    }
}

pub(crate) fn graph_err(e: neo4rs::Error) -> AppError {
    record_store_error(StoreKind::Graph);
    AppError::DataSource {
        store: StoreKind::Graph,
        message: e.to_string(),
    }
}
