use anyhow::Context;
use clap::Subcommand;
use pulse_client::PulseClient;
use pulse_core::{StatusSource, StreamState, StreamStatus};

/// Sub-commands available under `stream`.
#[derive(Debug, Subcommand)]
pub(crate) enum StreamCommands {
    /// Start tracking a term, replacing any active stream
    Start { term: String },
    /// Stop the active stream
    Stop,
    /// Show whether a stream is active
    Status,
}

pub(crate) async fn run_stream(client: &PulseClient, command: StreamCommands) -> anyhow::Result<()> {
    match command {
        StreamCommands::Start { term } => {
            let state = client
                .start_stream(&term)
                .await
                .context("failed to start stream")?;
            println!("{}", describe_state(&state));
        }
        StreamCommands::Stop => {
            let state = client.stop_stream().await.context("failed to stop stream")?;
            println!("{}", describe_state(&state));
        }
        StreamCommands::Status => {
            let status = client
                .stream_status()
                .await
                .context("failed to read stream status")?;
            println!("{}", describe_status(&status));
        }
    }
    Ok(())
}

pub(crate) fn describe_state(state: &StreamState) -> String {
    match (state.active_term(), state.started_at) {
        (Some(term), Some(at)) => format!(
            "tracking \"{term}\" since {}",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        (Some(term), None) => format!("tracking \"{term}\""),
        (None, _) => "idle".to_string(),
    }
}

fn describe_status(status: &StreamStatus) -> String {
    let base = match (&status.search_term, status.is_active) {
        (Some(term), true) => format!("active: \"{term}\""),
        _ => "idle".to_string(),
    };
    match status.source {
        StatusSource::Persisted => base,
        StatusSource::Cached => format!("{base} (store unreachable; last known state)"),
    }
}
