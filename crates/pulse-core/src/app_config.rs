use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Server-side configuration: database, listener, and collaborator credentials.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub synthetic_min_records: i64,
    pub twitter_bearer_token: Option<String>,
    pub twitter_api_key: Option<String>,
    pub twitter_api_secret: Option<String>,
}

impl AppConfig {
    /// Presence report for collaborator credentials. Values are never exposed.
    #[must_use]
    pub fn credential_presence(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("DATABASE_URL", !self.database_url.is_empty()),
            ("TWITTER_BEARER_TOKEN", self.twitter_bearer_token.is_some()),
            ("TWITTER_API_KEY", self.twitter_api_key.is_some()),
            ("TWITTER_API_SECRET", self.twitter_api_secret.is_some()),
        ]
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("synthetic_min_records", &self.synthetic_min_records)
            .field(
                "twitter_bearer_token",
                &self.twitter_bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "twitter_api_key",
                &self.twitter_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "twitter_api_secret",
                &self.twitter_api_secret.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Configuration for consumers of the HTTP surface (the CLI dashboard).
#[derive(Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub api_token: Option<String>,
    pub log_level: String,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl ClientConfig {
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}
