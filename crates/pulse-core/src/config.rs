use std::env::VarError;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::app_config::{AppConfig, ClientConfig, Environment};
use crate::ConfigError;

/// Load server configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load server configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load client configuration (server URL, refresh cadence, retry policy).
///
/// No variable is required; every field has a default.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an unparseable value.
pub fn load_client_config() -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_client_config(|key| std::env::var(key))
}

/// Env lookup helpers shared by both builders.
struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    fn require(&self, var: &str) -> Result<String, ConfigError> {
        (self.lookup)(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    }

    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).ok().filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, var: &str, default: &str) -> String {
        (self.lookup)(var).unwrap_or_else(|_| default.to_string())
    }

    fn parse<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.or_default(var, default);
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Build server configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env_vars = Env { lookup };

    let database_url = env_vars.require("DATABASE_URL")?;
    let env = parse_environment(&env_vars.or_default("PULSE_ENV", "development"));
    let bind_addr: SocketAddr = env_vars.parse("PULSE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = env_vars.or_default("PULSE_LOG_LEVEL", "info");

    let db_max_connections = env_vars.parse("PULSE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = env_vars.parse("PULSE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = env_vars.parse("PULSE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let synthetic_min_records = env_vars.parse("PULSE_SYNTHETIC_MIN_RECORDS", "25")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        synthetic_min_records,
        twitter_bearer_token: env_vars.optional("TWITTER_BEARER_TOKEN"),
        twitter_api_key: env_vars.optional("TWITTER_API_KEY"),
        twitter_api_secret: env_vars.optional("TWITTER_API_SECRET"),
    })
}

fn build_client_config<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env_vars = Env { lookup };

    let refresh_interval_secs: u64 = env_vars.parse("PULSE_REFRESH_INTERVAL_SECS", "5")?;
    if refresh_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PULSE_REFRESH_INTERVAL_SECS".to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }

    Ok(ClientConfig {
        server_url: env_vars.or_default("PULSE_SERVER_URL", "http://127.0.0.1:3000"),
        api_token: env_vars.optional("PULSE_API_TOKEN"),
        log_level: env_vars.or_default("PULSE_LOG_LEVEL", "info"),
        refresh_interval_secs,
        request_timeout_secs: env_vars.parse("PULSE_CLIENT_TIMEOUT_SECS", "30")?,
        max_retries: env_vars.parse("PULSE_CLIENT_MAX_RETRIES", "3")?,
        retry_backoff_ms: env_vars.parse("PULSE_CLIENT_RETRY_BACKOFF_MS", "500")?,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
