//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use actionlog_core::config::AppConfig;
use actionlog_database::repositories::ActionLogBatchRepository;
use actionlog_service::buffer::ActionLogBuffer;
use actionlog_service::ingest::IngestService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Shared in-memory log buffer (for health reporting).
    pub buffer: Arc<ActionLogBuffer>,
    /// Asynchronous ingestion service.
    pub ingest: Arc<IngestService>,
    /// Persisted batch repository (for health reporting).
    pub batch_repo: Arc<ActionLogBatchRepository>,
}
