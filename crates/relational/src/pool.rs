//! Connection pool management for the relational store

use scholarlens_common::config::RelationalConfig;
use scholarlens_common::errors::{AppError, Result, StoreKind};
use scholarlens_common::metrics::record_store_error;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// Pooled connection to the relational store.
///
/// The system this replaces opened and closed one connection per query;
/// pooling changes no observable semantics, only reuse discipline.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new pool from configuration
    pub async fn new(config: &RelationalConfig) -> Result<Self> {
        info!("Connecting to relational store...");

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(false);

        let conn = Database::connect(opts).await.map_err(|e| {
            record_store_error(StoreKind::Relational);
            AppError::DataSource {
                store: StoreKind::Relational,
                message: format!("failed to connect: {}", e),
            }
        })?;

        info!("Relational store connection established");

        Ok(Self { conn })
    }

    /// Get the underlying connection
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Ping the store to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| {
                record_store_error(StoreKind::Relational);
                AppError::DataSource {
                    store: StoreKind::Relational,
                    message: format!("ping failed: {}", e),
                }
            })?;
        Ok(())
    }
}
