//! Synthetic record generation for empty or sparse stores.

use chrono::{DateTime, Duration, Utc};
use pulse_analytics::score_text;
use pulse_core::Record;
use rand::seq::IndexedRandom;
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::records::{count_synthetic_records, insert_record};
use crate::DbError;

const TEMPLATES: &[&str] = &[
    "Just tried the new {topic} release and it is amazing #{tag}",
    "Another outage with {topic} today, really disappointed #{tag}",
    "Reading up on {topic} this morning #{tag} #learning",
    "Honestly {topic} has been great for our team, would recommend #{tag}",
    "Is anyone else seeing {topic} crash after the update? #{tag} #bug",
    "Conference talk about {topic} starting in ten minutes #{tag}",
    "The {topic} community is so much fun to be part of #{tag}",
    "Slow builds again, {topic} needs a better cache story #{tag}",
    "Wrote a short thread about {topic} internals #{tag}",
    "Benchmarks show {topic} is impressive on large inputs #{tag} #performance",
];

const TOPICS: &[(&str, &str)] = &[
    ("Rust", "rustlang"),
    ("Postgres", "postgres"),
    ("Kubernetes", "k8s"),
    ("WebAssembly", "wasm"),
    ("TypeScript", "typescript"),
    ("the compiler", "compilers"),
    ("our CI pipeline", "devops"),
    ("open source", "opensource"),
];

const AUTHORS: &[&str] = &[
    "ferris_fan",
    "dataops_dana",
    "byte_wrangler",
    "cloud_sam",
    "latency_lee",
    "query_quinn",
    "patch_pat",
    "stack_sky",
];

/// Records are spread over this many minutes before `now`.
const SPREAD_MINUTES: i64 = 24 * 60;

/// Build `count` synthetic records timestamped within the last day.
///
/// Each text is labeled with the lexicon scorer.
pub fn synthetic_records<R: Rng + ?Sized>(
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Record> {
    (0..count)
        .map(|_| {
            let template = TEMPLATES.choose(rng).copied().unwrap_or(TEMPLATES[0]);
            let (topic, tag) = TOPICS.choose(rng).copied().unwrap_or(TOPICS[0]);
            let author = AUTHORS.choose(rng).copied().unwrap_or(AUTHORS[0]);
            let text = template.replace("{topic}", topic).replace("{tag}", tag);
            let (sentiment, sentiment_score) = score_text(&text);
            Record {
                id: format!("synthetic-{}", Uuid::new_v4()),
                text,
                author: author.to_string(),
                created_at: now - Duration::minutes(rng.random_range(0..SPREAD_MINUTES)),
                sentiment,
                sentiment_score,
                is_synthetic: true,
            }
        })
        .collect()
}

/// Insert `count` fresh synthetic records in one transaction.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; nothing is written then.
pub async fn seed_synthetic_records(pool: &PgPool, count: usize) -> Result<usize, DbError> {
    let records = synthetic_records(count, Utc::now(), &mut rand::rng());

    let mut tx = pool.begin().await?;
    let mut written = 0usize;
    for record in &records {
        if insert_record(&mut *tx, record).await? {
            written += 1;
        }
    }
    tx.commit().await?;

    Ok(written)
}

/// Insert enough synthetic records to reach `minimum`.
///
/// Returns the number of rows written, 0 if the floor is already met.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if counting or inserting fails.
pub async fn top_up_synthetic_records(pool: &PgPool, minimum: i64) -> Result<usize, DbError> {
    let existing = count_synthetic_records(pool).await?;
    let missing = usize::try_from(minimum.saturating_sub(existing)).unwrap_or(0);
    if missing == 0 {
        return Ok(0);
    }
    seed_synthetic_records(pool, missing).await
}
