//! Background job scheduler.
//!
//! Keeps a floor of synthetic records in the store so the dashboard has
//! something to show before real records arrive.

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Every ten minutes, on the minute.
const TOP_UP_SCHEDULE: &str = "0 */10 * * * *";

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    synthetic_min_records: i64,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_synthetic_top_up(&scheduler, pool, synthetic_min_records).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_synthetic_top_up(
    scheduler: &JobScheduler,
    pool: PgPool,
    minimum: i64,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(TOP_UP_SCHEDULE, move |_uuid, _lock| {
        let pool = pool.clone();
        Box::pin(async move { run_synthetic_top_up(&pool, minimum).await })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

async fn run_synthetic_top_up(pool: &PgPool, minimum: i64) {
    match pulse_db::top_up_synthetic_records(pool, minimum).await {
        Ok(0) => tracing::debug!(minimum, "scheduler: synthetic floor already met"),
        Ok(written) => tracing::info!(written, minimum, "scheduler: synthetic records topped up"),
        Err(e) => tracing::error!(error = %e, "scheduler: synthetic top-up failed"),
    }
}
