//! Database operations for the single-row `stream_config` table.

use chrono::{DateTime, Utc};
use pulse_core::StreamState;
use sqlx::PgPool;

use crate::DbError;

const STREAM_CONFIG_ID: i16 = 1;

/// The `stream_config` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StreamConfigRow {
    pub search_term: Option<String>,
    pub is_active: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<StreamConfigRow> for StreamState {
    fn from(row: StreamConfigRow) -> Self {
        Self {
            search_term: row.search_term,
            is_active: row.is_active,
            started_at: row.started_at,
            stopped_at: row.stopped_at,
        }
    }
}

/// Write `state` as the stream-control record. Last write wins.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_stream_state(pool: &PgPool, state: &StreamState) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO stream_config (id, search_term, is_active, started_at, stopped_at) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (id) DO UPDATE SET \
             search_term = EXCLUDED.search_term, \
             is_active = EXCLUDED.is_active, \
             started_at = EXCLUDED.started_at, \
             stopped_at = EXCLUDED.stopped_at, \
             updated_at = NOW()",
    )
    .bind(STREAM_CONFIG_ID)
    .bind(state.search_term.as_deref())
    .bind(state.is_active)
    .bind(state.started_at)
    .bind(state.stopped_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read the stream-control record; `None` before the first write.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_stream_state(pool: &PgPool) -> Result<Option<StreamState>, DbError> {
    let row = sqlx::query_as::<_, StreamConfigRow>(
        "SELECT search_term, is_active, started_at, stopped_at, updated_at \
         FROM stream_config WHERE id = $1",
    )
    .bind(STREAM_CONFIG_ID)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(StreamState::from))
}
