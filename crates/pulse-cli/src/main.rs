mod db;
mod health;
mod records;
mod render;
mod stream;
mod watch;

use clap::{CommandFactory, Parser, Subcommand};
use pulse_client::PulseClient;
use pulse_core::Sentiment;
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;
use crate::stream::StreamCommands;

#[derive(Debug, Parser)]
#[command(name = "pulse-cli")]
#[command(about = "Live sentiment dashboard for a tracked search term")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Track a term and redraw the dashboard after every refresh
    Watch {
        term: String,

        /// Seconds between refreshes (defaults to `PULSE_REFRESH_INTERVAL_SECS`)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: Option<u64>,

        /// Only list records with this label
        #[arg(long)]
        sentiment: Option<Sentiment>,
    },
    /// Control the server-side stream
    Stream {
        #[command(subcommand)]
        command: StreamCommands,
    },
    /// Fetch the current batch for a term once and print it
    Records {
        term: String,

        /// Only list records with this label
        #[arg(long)]
        sentiment: Option<Sentiment>,

        /// Maximum records to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Check that the server and its database are reachable
    Health,
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pulse_core::load_client_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Watch {
            term,
            interval_secs,
            sentiment,
        } => {
            let client = PulseClient::from_config(&config)?;
            let period = interval_secs
                .map_or_else(|| config.refresh_interval(), std::time::Duration::from_secs);
            watch::run_watch(client, &term, period, sentiment).await
        }
        Commands::Stream { command } => {
            let client = PulseClient::from_config(&config)?;
            stream::run_stream(&client, command).await
        }
        Commands::Records {
            term,
            sentiment,
            limit,
        } => {
            let client = PulseClient::from_config(&config)?;
            records::run_records(&client, &term, sentiment, limit).await
        }
        Commands::Health => {
            let client = PulseClient::from_config(&config)?;
            health::run_health(&client).await
        }
        Commands::Db { command } => db::run_db(command).await,
    }
}
