//! Typed HTTP client for the pulse server.

pub mod client;
pub mod error;
mod retry;
mod source;
pub mod types;

pub use client::PulseClient;
pub use error::ClientError;
pub use types::HealthReport;
