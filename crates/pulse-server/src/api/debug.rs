use std::collections::BTreeMap;

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

/// Presence-only view of the server configuration.
#[derive(Debug, Serialize)]
pub(super) struct ConfigReport {
    pub environment: String,
    pub credentials: BTreeMap<&'static str, bool>,
}

pub(super) async fn config_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ConfigReport>> {
    let report = ConfigReport {
        environment: state.config.env.to_string(),
        credentials: state.config.credential_presence().into_iter().collect(),
    };
    ApiResponse::new(req_id.0, report)
}
