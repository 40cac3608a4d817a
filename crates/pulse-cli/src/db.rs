//! Database maintenance commands. These talk to Postgres directly and need
//! `DATABASE_URL`.

use anyhow::Context;
use clap::Subcommand;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub(crate) enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Insert synthetic records
    Seed {
        #[arg(long, default_value_t = 25)]
        count: usize,
    },
}

pub(crate) async fn run_db(command: DbCommands) -> anyhow::Result<()> {
    let config = pulse_core::load_app_config()?;
    let pool = pulse_db::connect_pool(
        &config.database_url,
        pulse_db::PoolConfig::from_app_config(&config),
    )
    .await
    .context("failed to connect to database")?;

    match command {
        DbCommands::Ping => {
            pulse_db::ping(&pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = pulse_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed { count } => run_seed(&pool, count).await?,
    }

    Ok(())
}

async fn run_seed(pool: &sqlx::PgPool, count: usize) -> anyhow::Result<()> {
    if count == 0 {
        println!("nothing to seed");
        return Ok(());
    }
    let written = pulse_db::seed_synthetic_records(pool, count)
        .await
        .context("failed to seed synthetic records")?;
    tracing::info!(written, "synthetic records seeded");
    println!("inserted {written} synthetic record(s)");
    Ok(())
}
