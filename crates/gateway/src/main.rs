//! ScholarLens API Gateway
//!
//! The entry point for the academic insight dashboard backend.
//! Handles:
//! - Dashboard action dispatch across the three stores
//! - Parameterized faculty-ratio lookups
//! - Observability (logging, metrics, tracing)

mod actions;
mod handlers;
mod orchestrator;
mod presentation;

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use scholarlens_common::{config::AppConfig, metrics};
use scholarlens_document::{DocumentAnalytics, DocumentStore};
use scholarlens_graph::{GraphClient, GraphQueries, GraphStore};
use scholarlens_relational::{DbPool, RelationalQueries, RelationalStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use orchestrator::Orchestrator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub relational: Arc<dyn RelationalQueries>,
    pub document: Arc<dyn DocumentAnalytics>,
    pub graph: Arc<dyn GraphQueries>,
    pub orchestrator: Arc<Orchestrator>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration before tracing so the filter honors it
    let config = Arc::new(AppConfig::load()?);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.observability.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting ScholarLens API Gateway v{}", scholarlens_common::VERSION);

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port != 0 {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .add_global_label("service", &config.observability.service_name)
            .install()?;
        info!("Prometheus exporter listening on {}", addr);
    }

    // Connect the three stores
    info!("Connecting to relational store...");
    let pool = DbPool::new(&config.relational).await?;
    let relational: Arc<dyn RelationalQueries> =
        Arc::new(RelationalStore::new(pool, config.relational.search_limit));

    info!("Connecting to document store...");
    let document_store = DocumentStore::connect(&config.document).await?;
    document_store.ensure_indexes().await?;
    let document: Arc<dyn DocumentAnalytics> = Arc::new(document_store);

    info!("Connecting to graph store...");
    let client = GraphClient::connect(&config.graph).await?;
    let graph: Arc<dyn GraphQueries> = Arc::new(GraphStore::new(client));

    let orchestrator = Arc::new(Orchestrator::new(
        relational.clone(),
        document.clone(),
        graph.clone(),
    ));

    let state = AppState {
        config: config.clone(),
        relational,
        document,
        graph,
        orchestrator,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let api_routes = Router::new()
        .route("/faculty-ratio", get(handlers::ratio::faculty_ratio))
        .route("/actions", post(handlers::actions::dispatch_action));

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
