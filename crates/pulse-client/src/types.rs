//! Wire envelopes of the pulse HTTP API.

use serde::{Deserialize, Serialize};

/// Success envelope; `meta` is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Error envelope shared by handlers and middleware.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartStreamBody<'a> {
    pub term: &'a str,
}

/// Server health as reported by `GET /api/v1/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub database: String,
}

impl HealthReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
