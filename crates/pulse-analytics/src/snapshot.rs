//! Dashboard snapshot: every view derived from one batch.

use pulse_core::{Batch, MAX_RECORDS_PER_QUERY};
use serde::Serialize;

use crate::frequency::{hashtag_frequencies, word_frequencies, FrequencyTable};
use crate::tally::SentimentTally;
use crate::top_k::{normalized_weights, rank, top_k, TopKEntry, WeightRange};

/// Hashtags shown in the ranking panel.
pub const HASHTAG_LIMIT: usize = 10;
/// Words shown in the word cloud.
pub const WORD_LIMIT: usize = 20;

/// A dashboard panel's content, distinguishing "nothing yet" from a partial fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Panel<T> {
    NoData,
    /// Fewer items than the panel's capacity.
    Partial(T),
    /// Capacity reached.
    Full(T),
}

impl<T> Panel<T> {
    /// Classify `value` holding `len` items against `capacity`.
    #[must_use]
    pub fn classify(len: usize, capacity: usize, value: T) -> Self {
        if len == 0 {
            Self::NoData
        } else if len < capacity {
            Self::Partial(value)
        } else {
            Self::Full(value)
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::NoData => None,
            Self::Partial(value) | Self::Full(value) => Some(value),
        }
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        !matches!(self, Self::NoData)
    }
}

/// One word-cloud entry with both display weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCloudEntry {
    pub word: String,
    pub count: u64,
    pub font_size_rem: f64,
    pub opacity: f64,
}

/// Top `k` words, each weighted into the font-size and opacity ranges.
#[must_use]
pub fn word_cloud(table: &FrequencyTable, k: usize) -> Vec<WordCloudEntry> {
    let ranked = rank(table, k);
    let weights = normalized_weights(&ranked);
    ranked
        .into_iter()
        .zip(weights)
        .map(|((word, count), normalized)| WordCloudEntry {
            word: word.to_string(),
            count,
            font_size_rem: WeightRange::FONT_SIZE_REM.scale(normalized),
            opacity: WeightRange::OPACITY.scale(normalized),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub record_count: usize,
    pub using_fallback_data: bool,
    pub sentiment: Panel<SentimentTally>,
    /// Hashtag keys are lowercase without `#`.
    pub hashtags: Panel<Vec<TopKEntry>>,
    pub words: Panel<Vec<WordCloudEntry>>,
}

impl DashboardSnapshot {
    /// Run the tally, hashtag and word pipelines over `batch`.
    #[must_use]
    pub fn from_batch(batch: &Batch) -> Self {
        let records = &batch.records;
        let window = usize::try_from(MAX_RECORDS_PER_QUERY).unwrap_or(usize::MAX);

        let tally = SentimentTally::from_records(records);
        let hashtags = top_k(
            &hashtag_frequencies(records),
            HASHTAG_LIMIT,
            WeightRange::OPACITY,
        );
        let words = word_cloud(&word_frequencies(records), WORD_LIMIT);

        Self {
            record_count: records.len(),
            using_fallback_data: batch.using_fallback_data,
            sentiment: Panel::classify(tally.total(), window, tally),
            hashtags: Panel::classify(hashtags.len(), HASHTAG_LIMIT, hashtags),
            words: Panel::classify(words.len(), WORD_LIMIT, words),
        }
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
