//! Action-log ingestion handler.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use actionlog_core::error::AppError;
use actionlog_service::ingest::ActionEvent;

use crate::dto::request::ActionLogBody;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::RequestMetadata;
use crate::state::AppState;

/// POST /action-log
///
/// Validates the payloads, hands them to the ingestion service together
/// with the captured metadata snapshot, and answers success immediately.
/// Whatever happens to the events downstream — batching, flushing, a
/// failed append — is never reported back to the client.
pub async fn collect(
    State(state): State<AppState>,
    RequestMetadata(meta): RequestMetadata,
    Json(body): Json<ActionLogBody>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let payloads = body.into_payloads();

    for payload in &payloads {
        payload
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid action log payload: {e}")))?;
    }

    let events: Vec<ActionEvent> = payloads
        .into_iter()
        .map(|payload| ActionEvent {
            event_type: payload.event_type,
            target: payload.target,
        })
        .collect();

    state.ingest.submit(meta, events);

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Action log accepted".to_string(),
    })))
}
