//! Offline tests for pulse-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Utc;
use pulse_core::{AppConfig, Environment, StreamState};
use pulse_db::{PoolConfig, StreamConfigRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        synthetic_min_records: 25,
        twitter_bearer_token: None,
        twitter_api_key: None,
        twitter_api_secret: None,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn stream_config_row_maps_to_state() {
    let started = Utc::now();
    let row = StreamConfigRow {
        search_term: Some("rust".to_string()),
        is_active: true,
        started_at: Some(started),
        stopped_at: None,
        updated_at: started,
    };

    let state = StreamState::from(row);
    assert_eq!(state.active_term(), Some("rust"));
    assert_eq!(state.started_at, Some(started));
    assert!(state.stopped_at.is_none());
}

#[tokio::test]
async fn lazy_pool_rejects_malformed_url() {
    assert!(pulse_db::connect_pool_lazy("not a url", PoolConfig::default()).is_err());
}
