use pulse_core::{Record, Sentiment};
use serde::Serialize;

/// Per-label record counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTally {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentTally {
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        records.iter().fold(Self::default(), |mut tally, record| {
            tally.add(record.sentiment);
            tally
        })
    }

    pub fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    #[must_use]
    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Share of `sentiment` in percent, 0 for an empty tally.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self, sentiment: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(sentiment) as f64 * 100.0 / total as f64
    }
}

/// Records carrying `sentiment`, in batch order.
pub fn filter_by_sentiment(
    records: &[Record],
    sentiment: Sentiment,
) -> impl Iterator<Item = &Record> + '_ {
    records.iter().filter(move |r| r.sentiment == sentiment)
}
