//! vtrk-li library interface
//!
//! Exposes the ingestion parser, catalog clients, orchestrator, and router
//! for integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod ingest;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::services::{CatalogClient, DiscogsClient, ImportSettings};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Release-metadata catalog client
    pub catalog: Arc<CatalogClient>,
    /// Discogs client, present only when a token is configured
    pub discogs: Option<Arc<DiscogsClient>>,
    /// Orchestrator pacing configuration
    pub import_settings: Arc<ImportSettings>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        catalog: CatalogClient,
        discogs: Option<DiscogsClient>,
        import_settings: ImportSettings,
    ) -> Self {
        Self {
            db,
            catalog: Arc::new(catalog),
            discogs: discogs.map(Arc::new),
            import_settings: Arc::new(import_settings),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember the most recent error for the health endpoint
    pub async fn record_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::import_routes())
        .merge(api::enrich_routes())
        .merge(api::album_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
