use anyhow::Context;
use pulse_analytics::SentimentTally;
use pulse_client::PulseClient;
use pulse_core::Sentiment;

use crate::render;

/// One-shot fetch of the current batch for `term`.
pub(crate) async fn run_records(
    client: &PulseClient,
    term: &str,
    filter: Option<Sentiment>,
    limit: usize,
) -> anyhow::Result<()> {
    let batch = client
        .fetch_records(term)
        .await
        .with_context(|| format!("failed to fetch records for \"{term}\""))?;

    if batch.using_fallback_data {
        println!("{}", render::FALLBACK_BANNER);
    }

    let tally = SentimentTally::from_records(&batch.records);
    println!(
        "{} records: {} positive, {} neutral, {} negative",
        batch.len(),
        tally.positive,
        tally.neutral,
        tally.negative
    );
    println!("{}", render::record_list(&batch.records, filter, limit));
    Ok(())
}
