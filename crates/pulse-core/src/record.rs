//! Classified text records and the batch shape exchanged on every refresh.
//!
//! Records reach the dashboard from a document store whose field encodings
//! drift: ids may be strings, numbers, or split 64-bit objects; timestamps may
//! be RFC 3339 strings or epoch milliseconds; optional fields may be missing.
//! All of that is resolved here, once, when a record is decoded. Consumers only
//! ever see the explicit [`Record`] schema.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Upper bound on records returned by a single store query.
pub const MAX_RECORDS_PER_QUERY: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Map a stored label onto a sentiment, defaulting unknown labels to neutral.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.trim().parse().unwrap_or(Sentiment::Neutral)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!(
                "unknown sentiment '{other}' (expected positive, neutral, or negative)"
            )),
        }
    }
}

/// One classified short text post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRecord")]
pub struct Record {
    pub id: String,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
    pub is_synthetic: bool,
}

/// Full replacement set of records for one refresh cycle, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[serde(alias = "tweets")]
    pub records: Vec<Record>,
    #[serde(default, alias = "usingMockData")]
    pub using_fallback_data: bool,
}

impl Batch {
    /// Build a batch, deriving the fallback flag from the records themselves.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        let using_fallback_data = records.iter().any(|r| r.is_synthetic);
        Self {
            records,
            using_fallback_data,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Wire shape accepted for a record before defaults are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    text: String,
    #[serde(default, alias = "username")]
    author: Option<String>,
    #[serde(alias = "created_at", deserialize_with = "deserialize_timestamp")]
    created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_label")]
    sentiment: Option<String>,
    #[serde(
        default,
        alias = "sentiment_score",
        deserialize_with = "deserialize_score"
    )]
    sentiment_score: Option<f64>,
    #[serde(default, alias = "is_synthetic", alias = "is_mock")]
    is_synthetic: Option<bool>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Self {
            id: raw.id,
            text: raw.text,
            author: raw.author.unwrap_or_default(),
            created_at: raw.created_at,
            sentiment: raw
                .sentiment
                .as_deref()
                .map_or(Sentiment::Neutral, Sentiment::from_label),
            sentiment_score: raw.sentiment_score.unwrap_or(0.0),
            is_synthetic: raw.is_synthetic.unwrap_or(false),
        }
    }
}

/// Accepts string ids, numeric ids, and `{ "low": .., "high": .. }` split
/// 64-bit objects (the low word is taken as the decimal id).
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Object(map) => match map.get("low") {
            Some(Value::Number(low)) if map.contains_key("high") => low.to_string(),
            _ => return Err(D::Error::custom("id object must carry numeric `low` and `high`")),
        },
        _ => return Err(D::Error::custom("id must be a string, number, or split object")),
    };

    if id.trim().is_empty() {
        return Err(D::Error::custom("id cannot be empty"));
    }
    Ok(id)
}

/// Accepts RFC 3339 strings and epoch milliseconds.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            let ms = n
                .as_i64()
                .ok_or_else(|| D::Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| D::Error::custom("timestamp out of range"))
        }
        Value::String(s) => s
            .parse::<DateTime<Utc>>()
            .map_err(|e| D::Error::custom(format!("invalid RFC3339 timestamp: {e}"))),
        _ => Err(D::Error::custom("timestamp must be a number or string")),
    }
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score.filter(|s| s.is_finite()))
}
