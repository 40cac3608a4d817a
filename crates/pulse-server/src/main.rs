mod api;
mod middleware;
mod scheduler;
mod store;

use std::sync::Arc;

use anyhow::Context;
use pulse_stream::{StreamController, StreamStore};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
    store::PgStreamStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(pulse_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = pulse_db::PoolConfig::from_app_config(&config);
    let pool = pulse_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to database")?;
    let applied = pulse_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let _scheduler =
        scheduler::build_scheduler(pool.clone(), config.synthetic_min_records).await?;

    let store: Arc<dyn StreamStore> = Arc::new(PgStreamStore::new(pool.clone()));
    let stream = Arc::new(Mutex::new(StreamController::restore(store).await));

    let auth = AuthState::from_env(matches!(
        config.env,
        pulse_core::Environment::Development
    ))?;
    let state = AppState {
        pool,
        stream,
        config: Arc::clone(&config),
    };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "pulse server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
