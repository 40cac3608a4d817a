//! Database operations for the `records` table.

use chrono::{DateTime, Utc};
use pulse_core::{Batch, Record, Sentiment, MAX_RECORDS_PER_QUERY};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecordRow {
    pub id: String,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub is_synthetic: bool,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            author: row.author,
            created_at: row.created_at,
            sentiment: Sentiment::from_label(&row.sentiment),
            sentiment_score: row.sentiment_score,
            is_synthetic: row.is_synthetic,
        }
    }
}

/// Newest records whose text contains `term` (case-insensitive), plus every
/// synthetic record, capped at [`MAX_RECORDS_PER_QUERY`].
///
/// The term is matched literally; `%`, `_` and regex metacharacters carry no
/// special meaning.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_records_for_term(pool: &PgPool, term: &str) -> Result<Vec<RecordRow>, DbError> {
    let rows = sqlx::query_as::<_, RecordRow>(
        "SELECT id, text, author, created_at, sentiment, sentiment_score, is_synthetic \
         FROM records \
         WHERE strpos(lower(text), lower($1)) > 0 OR is_synthetic \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(term)
    .bind(MAX_RECORDS_PER_QUERY)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// [`list_records_for_term`] as a [`Batch`] carrying the fallback flag.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn fetch_batch_for_term(pool: &PgPool, term: &str) -> Result<Batch, DbError> {
    let rows = list_records_for_term(pool, term).await?;
    Ok(Batch::new(rows.into_iter().map(Record::from).collect()))
}

/// Insert a record unless one with the same id exists.
///
/// Returns `true` if a row was written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_record<'e, E>(executor: E, record: &Record) -> Result<bool, DbError>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO records \
             (id, text, author, created_at, sentiment, sentiment_score, is_synthetic) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(&record.id)
    .bind(&record.text)
    .bind(&record.author)
    .bind(record.created_at)
    .bind(record.sentiment.as_str())
    .bind(record.sentiment_score)
    .bind(record.is_synthetic)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Number of synthetic records currently stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_synthetic_records(pool: &PgPool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE is_synthetic")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
