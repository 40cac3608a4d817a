//! Postgres-backed [`StreamStore`].

use async_trait::async_trait;
use pulse_core::StreamState;
use pulse_stream::{StreamError, StreamStore};
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct PgStreamStore {
    pool: PgPool,
}

impl PgStreamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StreamStore for PgStreamStore {
    async fn save(&self, state: &StreamState) -> Result<(), StreamError> {
        pulse_db::upsert_stream_state(&self.pool, state)
            .await
            .map_err(|e| StreamError::StoreUnavailable(e.to_string()))
    }

    async fn load(&self) -> Result<Option<StreamState>, StreamError> {
        pulse_db::get_stream_state(&self.pool)
            .await
            .map_err(|e| StreamError::StoreUnavailable(e.to_string()))
    }
}
