use pulse_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    /// Rejected input; raised before any state changes.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("stream store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("record fetch failed: {0}")]
    Fetch(String),
}

impl From<CoreError> for StreamError {
    fn from(err: CoreError) -> Self {
        Self::Validation(err.to_string())
    }
}
