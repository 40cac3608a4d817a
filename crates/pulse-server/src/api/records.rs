use axum::{
    extract::{Query, State},
    Extension, Json,
};
use pulse_core::{normalize_search_term, Batch};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct RecordsQuery {
    pub term: Option<String>,
}

/// Current batch for `term`: newest matches plus synthetic records, capped at 50.
pub(super) async fn list_records(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<ApiResponse<Batch>>, ApiError> {
    let term = normalize_search_term(query.term.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let batch = pulse_db::fetch_batch_for_term(&state.pool, term)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::debug!(
        term,
        count = batch.len(),
        using_fallback_data = batch.using_fallback_data,
        "records served"
    );

    Ok(ApiResponse::new(req_id.0, batch))
}
