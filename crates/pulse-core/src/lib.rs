//! Shared domain types and configuration for the pulse dashboard.

pub mod app_config;
pub mod config;
pub mod record;
pub mod stream;

use thiserror::Error;

pub use app_config::{AppConfig, ClientConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, load_client_config};
pub use record::{Batch, Record, Sentiment, MAX_RECORDS_PER_QUERY};
pub use stream::{StatusSource, StreamState, StreamStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("search term must not be empty")]
    EmptySearchTerm,
}

/// Trim a user-supplied search term, rejecting blank input.
///
/// # Errors
///
/// Returns [`CoreError::EmptySearchTerm`] if the term is empty or whitespace-only.
pub fn normalize_search_term(term: &str) -> Result<&str, CoreError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptySearchTerm);
    }
    Ok(trimmed)
}
