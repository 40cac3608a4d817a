//! Live dashboard: server-side stream plus a local refresh loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pulse_client::PulseClient;
use pulse_core::Sentiment;
use pulse_stream::RefreshLoop;

use crate::render;

/// Start the stream for `term`, redraw after every applied refresh, and stop
/// the stream on Ctrl-C.
pub(crate) async fn run_watch(
    client: PulseClient,
    term: &str,
    period: Duration,
    filter: Option<Sentiment>,
) -> anyhow::Result<()> {
    let started = client
        .start_stream(term)
        .await
        .context("failed to start stream")?;
    let term = started.active_term().unwrap_or(term).to_string();

    let mut refresh = RefreshLoop::new(Arc::new(client.clone()), period);
    let mut view = refresh.subscribe();
    refresh.activate(&term);
    println!("{}", render::waiting(&term));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("failed to listen for ctrl-c")?;
                break;
            }
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = view.borrow_and_update().latest.clone();
                if let Some(state) = latest {
                    print!("{}", render::CLEAR_SCREEN);
                    println!("{}", render::dashboard(&state, filter));
                }
            }
        }
    }

    refresh.deactivate();
    client.stop_stream().await.context("failed to stop stream")?;
    println!("stopped tracking \"{term}\"");
    Ok(())
}
