//! HTTP client for the pulse server's `/api/v1` surface.
//!
//! Every response is unwrapped from the server's `{ data, meta }` envelope;
//! non-2xx answers surface as [`ClientError::Api`] with the server's error
//! code. Idempotent reads retry transient failures; stream transitions do not.

use std::time::Duration;

use pulse_core::{Batch, ClientConfig, StreamState, StreamStatus};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{Envelope, ErrorEnvelope, HealthReport, StartStreamBody};

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Client for the pulse server.
///
/// Use [`PulseClient::from_config`] in binaries or
/// [`PulseClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct PulseClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl PulseClient {
    /// Build a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `server_url` does not parse.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Self::with_base_url(&config.server_url, config.request_timeout_secs)?
            .with_retry(config.max_retries, config.retry_backoff_ms);
        Ok(match &config.api_token {
            Some(token) => client.with_api_token(token),
            None => client,
        })
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("pulse-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // A trailing slash makes Url::join append to the path instead of
        // replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            api_token: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        })
    }

    #[must_use]
    pub fn with_api_token(mut self, token: &str) -> Self {
        self.api_token = Some(token.to_string());
        self
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = backoff_ms;
        self
    }

    /// Current batch for `term`: up to 50 records, newest first.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with status 400 for a blank term, 5xx on store failure.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body does not match the expected shape.
    pub async fn fetch_records(&self, term: &str) -> Result<Batch, ClientError> {
        let mut url = self.endpoint("api/v1/records")?;
        url.query_pairs_mut().append_pair("term", term);

        retry_with_backoff(self.max_retries, self.retry_backoff_ms, || {
            self.send(self.client.get(url.clone()), "records")
        })
        .await
    }

    /// Start tracking `term`, stopping any active stream first.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with status 400 for a blank term, 5xx if the
    ///   server could not persist the transition.
    /// - [`ClientError::Http`] on network failure.
    pub async fn start_stream(&self, term: &str) -> Result<StreamState, ClientError> {
        let url = self.endpoint("api/v1/stream/start")?;
        self.send(
            self.client.post(url).json(&StartStreamBody { term }),
            "stream/start",
        )
        .await
    }

    /// Stop the active stream; succeeds when already idle.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with a 5xx status if the server could not persist the transition.
    /// - [`ClientError::Http`] on network failure.
    pub async fn stop_stream(&self) -> Result<StreamState, ClientError> {
        let url = self.endpoint("api/v1/stream/stop")?;
        self.send(self.client.post(url), "stream/stop").await
    }

    /// Stream status; `source` tells whether it was read from storage or cache.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body does not match the expected shape.
    pub async fn stream_status(&self) -> Result<StreamStatus, ClientError> {
        let url = self.endpoint("api/v1/stream/status")?;
        retry_with_backoff(self.max_retries, self.retry_backoff_ms, || {
            self.send(self.client.get(url.clone()), "stream/status")
        })
        .await
    }

    /// Server health. A degraded server answers 503 with a report, which is
    /// returned as `Ok`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not a health report.
    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        let url = self.endpoint("api/v1/health")?;
        let response = self.client.get(url).send().await?;
        let body = response.text().await?;
        decode::<Envelope<HealthReport>>(&body, "health").map(|envelope| envelope.data)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends a request, maps non-2xx statuses to [`ClientError::Api`], and
    /// unwraps the `data` field of the success envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        decode::<Envelope<T>>(&body, context).map(|envelope| envelope.data)
    }
}

fn decode<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ClientError::Api {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        },
        Err(_) => ClientError::Api {
            status,
            code: "unknown".to_string(),
            message: body.chars().take(200).collect(),
        },
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
