//! Text analytics for the pulse dashboard.
//!
//! Every refresh hands a fresh [`Batch`](pulse_core::Batch) to this crate,
//! which derives three independent views from it: a sentiment tally, a
//! hashtag ranking, and a word cloud. Nothing here keeps state between
//! batches; each snapshot is built from scratch and replaces the previous one.

pub mod frequency;
pub mod hashtags;
pub mod score;
pub mod snapshot;
pub mod tally;
pub mod tokenize;
pub mod top_k;

pub use frequency::{hashtag_frequencies, word_frequencies, FrequencyTable};
pub use hashtags::{display_hashtag, extract_hashtags, hashtag_keys};
pub use score::{classify, lexicon_score, score_text};
pub use snapshot::{word_cloud, DashboardSnapshot, Panel, WordCloudEntry, HASHTAG_LIMIT, WORD_LIMIT};
pub use tally::{filter_by_sentiment, SentimentTally};
pub use tokenize::{tokenize, Tokens, STOPWORDS};
pub use top_k::{normalized_weights, rank, top_k, TopKEntry, WeightRange};
