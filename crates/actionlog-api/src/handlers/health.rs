//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let (database, persisted_batches) = match state.batch_repo.count().await {
        Ok(count) => ("connected".to_string(), Some(count)),
        Err(_) => ("unreachable".to_string(), None),
    };

    let last_write_time = state
        .batch_repo
        .find_latest()
        .await
        .ok()
        .flatten()
        .map(|batch| batch.write_time);

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: "ok".to_string(),
        database,
        buffered_records: state.buffer.buffered_records(),
        buffer_groups: state.buffer.group_count(),
        persisted_batches,
        last_write_time,
    }))
}
