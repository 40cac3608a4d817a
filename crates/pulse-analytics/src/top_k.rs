//! Top-K ranking with linearly normalized weights.

use serde::Serialize;

use crate::frequency::FrequencyTable;

/// Output range a normalized weight is mapped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl WeightRange {
    /// Word-cloud font size in rem.
    pub const FONT_SIZE_REM: Self = Self { min: 0.8, max: 1.5 };
    /// Word-cloud and hashtag badge opacity.
    pub const OPACITY: Self = Self { min: 0.5, max: 1.0 };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map `normalized` in `[0, 1]` onto this range.
    #[must_use]
    pub fn scale(self, normalized: f64) -> f64 {
        self.min + normalized * (self.max - self.min)
    }
}

/// One ranked key with its display weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopKEntry {
    pub key: String,
    pub count: u64,
    pub weight: f64,
}

/// The `k` most frequent keys, count descending.
///
/// The sort is stable, so equal counts keep the table's first-seen order.
#[must_use]
pub fn rank(table: &FrequencyTable, k: usize) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = table.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(k);
    ranked
}

/// Position of each count between the minimum and maximum of `ranked`, in `[0, 1]`.
///
/// Min and max are taken over the selected entries only. When every count is
/// equal the denominator is floored at 1, so all entries normalize to 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalized_weights(ranked: &[(&str, u64)]) -> Vec<f64> {
    let Some(max) = ranked.iter().map(|&(_, count)| count).max() else {
        return Vec::new();
    };
    let min = ranked.iter().map(|&(_, count)| count).min().unwrap_or(max);
    let span = (max - min).max(1) as f64;
    ranked
        .iter()
        .map(|&(_, count)| (count - min) as f64 / span)
        .collect()
}

/// Rank `table` and attach weights mapped into `range`.
#[must_use]
pub fn top_k(table: &FrequencyTable, k: usize, range: WeightRange) -> Vec<TopKEntry> {
    let ranked = rank(table, k);
    let weights = normalized_weights(&ranked);
    ranked
        .into_iter()
        .zip(weights)
        .map(|((key, count), normalized)| TopKEntry {
            key: key.to_string(),
            count,
            weight: range.scale(normalized),
        })
        .collect()
}

#[cfg(test)]
#[path = "top_k_test.rs"]
mod tests;
