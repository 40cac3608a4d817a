//! Plain-text rendering of the dashboard and record lists.
//!
//! Every function returns a `String`; callers decide when to print.

use pulse_analytics::{
    display_hashtag, filter_by_sentiment, Panel, SentimentTally, TopKEntry, WordCloudEntry,
};
use pulse_core::{Record, Sentiment};
use pulse_stream::RefreshState;

pub(crate) const NO_RECORDS: &str =
    "No records to display. Start tracking a topic to see records here.";
pub(crate) const NO_HASHTAGS: &str = "No hashtags found in tracked records";
pub(crate) const NO_WORDS: &str = "Not enough data to generate word cloud";
pub(crate) const FALLBACK_BANNER: &str =
    "! Using fallback data: synthetic records are blended into this view";

/// ANSI clear-screen and cursor-home, written before each redraw.
pub(crate) const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const BAR_WIDTH: usize = 30;
const TEXT_WIDTH: usize = 80;
const LATEST_LIMIT: usize = 10;
/// Words at or above this font size are shouted in the terminal cloud.
const EMPHASIS_REM: f64 = 1.2;

/// Full dashboard for one applied refresh, optionally narrowing the record list.
pub(crate) fn dashboard(state: &RefreshState, filter: Option<Sentiment>) -> String {
    let snapshot = &state.snapshot;
    let mut out = vec![format!(
        "pulse: tracking \"{}\" | {} records | refreshed {}",
        state.term,
        snapshot.record_count,
        state.refreshed_at.format("%H:%M:%S UTC"),
    )];

    if snapshot.using_fallback_data {
        out.push(FALLBACK_BANNER.to_string());
    }

    out.push(String::new());
    out.push(panel_heading("SENTIMENT", &snapshot.sentiment));
    out.extend(sentiment_lines(&snapshot.sentiment));

    out.push(String::new());
    out.push(panel_heading("TOP HASHTAGS", &snapshot.hashtags));
    out.extend(hashtag_lines(&snapshot.hashtags));

    out.push(String::new());
    out.push(panel_heading("WORD CLOUD", &snapshot.words));
    out.extend(word_lines(&snapshot.words));

    out.push(String::new());
    let heading = match filter {
        Some(sentiment) => format!("LATEST ({sentiment})"),
        None => "LATEST".to_string(),
    };
    out.push(heading);
    out.push(record_list(&state.batch.records, filter, LATEST_LIMIT));

    out.join("\n")
}

/// Message shown between activation and the first applied refresh.
pub(crate) fn waiting(term: &str) -> String {
    format!("pulse: tracking \"{term}\"; waiting for the first refresh (Ctrl-C to stop)")
}

/// Up to `limit` records, newest first, optionally restricted to one label.
pub(crate) fn record_list(records: &[Record], filter: Option<Sentiment>, limit: usize) -> String {
    let lines: Vec<String> = match filter {
        Some(sentiment) => filter_by_sentiment(records, sentiment)
            .take(limit)
            .map(record_line)
            .collect(),
        None => records.iter().take(limit).map(record_line).collect(),
    };

    if lines.is_empty() {
        return match filter {
            Some(sentiment) => format!("  No {sentiment} records in this batch"),
            None => format!("  {NO_RECORDS}"),
        };
    }
    lines.join("\n")
}

pub(crate) fn record_line(record: &Record) -> String {
    let author = if record.author.is_empty() {
        "unknown"
    } else {
        record.author.as_str()
    };
    let marker = if record.is_synthetic { "*" } else { " " };
    format!(
        "  {marker}[{:<8}] {} @{author}: {}",
        record.sentiment.as_str(),
        record.created_at.format("%Y-%m-%d %H:%M"),
        truncate(&record.text, TEXT_WIDTH),
    )
}

fn panel_heading<T>(title: &str, panel: &Panel<T>) -> String {
    match panel {
        Panel::Partial(_) => format!("{title} (partial)"),
        Panel::NoData | Panel::Full(_) => title.to_string(),
    }
}

fn sentiment_lines(panel: &Panel<SentimentTally>) -> Vec<String> {
    let Some(tally) = panel.value() else {
        return vec![format!("  {NO_RECORDS}")];
    };
    Sentiment::ALL
        .iter()
        .map(|&sentiment| {
            let percent = tally.percent(sentiment);
            format!(
                "  {:<9}{:>4}  {:>5.1}%  {}",
                sentiment.as_str(),
                tally.get(sentiment),
                percent,
                bar(percent),
            )
        })
        .collect()
}

fn hashtag_lines(panel: &Panel<Vec<TopKEntry>>) -> Vec<String> {
    let Some(entries) = panel.value() else {
        return vec![format!("  {NO_HASHTAGS}")];
    };
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "  {:>2}. {:<24}{:>4}",
                i + 1,
                display_hashtag(&entry.key),
                entry.count
            )
        })
        .collect()
}

fn word_lines(panel: &Panel<Vec<WordCloudEntry>>) -> Vec<String> {
    let Some(entries) = panel.value() else {
        return vec![format!("  {NO_WORDS}")];
    };
    let words: Vec<String> = entries
        .iter()
        .map(|entry| {
            let word = if entry.font_size_rem >= EMPHASIS_REM {
                entry.word.to_uppercase()
            } else {
                entry.word.clone()
            };
            format!("{word}({})", entry.count)
        })
        .collect();

    // Wrap the cloud to the text width.
    let mut lines = Vec::new();
    let mut current = String::from(" ");
    for word in words {
        if current.len() + word.len() + 1 > TEXT_WIDTH && current.len() > 1 {
            lines.push(std::mem::replace(&mut current, String::from(" ")));
        }
        current.push(' ');
        current.push_str(&word);
    }
    lines.push(current);
    lines
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

fn truncate(text: &str, width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > width {
        format!("{}...", flat.chars().take(width).collect::<String>())
    } else {
        flat
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
