//! audiolog - batch audio-metadata ingestion service
//!
//! Receives base64-encoded audio files tagged with a session id, measures
//! each file's playback length, and persists one metadata row per file in
//! SQLite. Partial success is the normal case: per-file failures are
//! reported inline and never abort the rest of a batch.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod time;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::{MetadataStore, SqliteMetadataStore};
use crate::ingest::{BatchProcessor, SymphoniaProbe};
use crate::time::SystemClock;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Batch pipeline with its injected capabilities
    pub processor: Arc<BatchProcessor>,
    /// Store handle for the retrieval endpoint
    pub store: Arc<dyn MetadataStore>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Wire the production capabilities around a database pool.
    pub fn new(pool: SqlitePool, store_timeout: Duration) -> Self {
        let store: Arc<dyn MetadataStore> =
            Arc::new(SqliteMetadataStore::new(pool, store_timeout));
        Self::with_store(store)
    }

    /// Wire state around an explicit store; tests swap in their own.
    pub fn with_store(store: Arc<dyn MetadataStore>) -> Self {
        let processor = BatchProcessor::new(
            Arc::new(SymphoniaProbe),
            Arc::clone(&store),
            Arc::new(SystemClock),
        );
        Self {
            processor: Arc::new(processor),
            store,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ingest_routes())
        .merge(api::health_routes())
        .with_state(state)
}
