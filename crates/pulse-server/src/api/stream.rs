use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use pulse_core::{StreamState, StreamStatus};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_stream_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct StartStreamRequest {
    #[serde(default)]
    pub term: String,
}

pub(super) async fn start_stream(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<StartStreamRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<StreamState>>, ApiError> {
    let Json(body) = payload
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;

    let started = state
        .stream
        .lock()
        .await
        .start(&body.term)
        .await
        .map_err(|e| map_stream_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(req_id.0, started))
}

pub(super) async fn stop_stream(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<StreamState>>, ApiError> {
    let stopped = state
        .stream
        .lock()
        .await
        .stop()
        .await
        .map_err(|e| map_stream_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(req_id.0, stopped))
}

/// Never fails: an unreadable store yields the cached state with `source: "cached"`.
pub(super) async fn stream_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<StreamStatus>> {
    let status = state.stream.lock().await.status().await;
    ApiResponse::new(req_id.0, status)
}
