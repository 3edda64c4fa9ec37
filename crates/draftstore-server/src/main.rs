//! Draftstore HTTP API Server
//!
//! Local backend for a word-processor add-in: REST endpoints for template
//! management plus a pass-through proxy for AI drafting requests.

use axum::{Router, extract::DefaultBodyLimit, response::Json, routing::get};
use draftstore::TemplateRepository;
use draftstore::storage::{FsBlobStorage, SqliteCatalog};
use serde_json::{Value, json};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod error;
mod models;
mod routes;

use config::ServerConfig;
use error::{ApiError, Result};

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<TemplateRepository>,
    pub config: ServerConfig,
    pub http: reqwest::Client,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "draftstore_server=debug,tower_http=debug".to_string()),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    info!(
        "Starting draftstore server on {}:{}",
        config.host, config.port
    );

    // Durable backends: one blob file per template, one catalog row each
    let blobs = FsBlobStorage::new(&config.blob_dir)
        .await
        .map_err(|e| ApiError::Config(e.to_string()))?;
    let catalog = SqliteCatalog::new(&config.database_url)
        .await
        .map_err(|e| ApiError::Config(e.to_string()))?;

    let repository = Arc::new(TemplateRepository::new(
        Arc::new(blobs),
        Arc::new(catalog),
    ));

    // Create application state
    let state = AppState {
        repository,
        config: config.clone(),
        http: reqwest::Client::new(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| ApiError::Config("Invalid HOST/PORT combination".to_string()))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", api_routes())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", routes::templates::router())
        .nest("/ai", routes::completions::router())
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "draftstore-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
