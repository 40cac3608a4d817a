//! Lexicon sentiment scorer used to label synthetic records.

use pulse_core::Sentiment;

/// Scores strictly above this are positive, strictly below its negation negative.
pub const NEUTRAL_BAND: f64 = 0.05;

/// General-purpose social-post word weights.
///
/// Keys are lowercase single words; positive weights push towards
/// [`Sentiment::Positive`], negative ones towards [`Sentiment::Negative`].
const LEXICON: &[(&str, f64)] = &[
    ("love", 0.5),
    ("loving", 0.5),
    ("great", 0.4),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("excellent", 0.5),
    ("good", 0.3),
    ("happy", 0.4),
    ("best", 0.5),
    ("fast", 0.2),
    ("recommend", 0.4),
    ("impressive", 0.4),
    ("excited", 0.4),
    ("win", 0.4),
    ("fun", 0.3),
    ("hate", -0.6),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("bad", -0.4),
    ("broken", -0.5),
    ("slow", -0.3),
    ("bug", -0.3),
    ("crash", -0.5),
    ("disappointed", -0.5),
    ("angry", -0.5),
    ("fail", -0.4),
    ("failed", -0.4),
    ("problem", -0.3),
    ("outage", -0.5),
];

/// Sum the lexicon weights of every word in `text`, clamped to `[-1.0, 1.0]`.
#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase()
        })
        .filter_map(|word| {
            LEXICON
                .iter()
                .find(|(entry, _)| *entry == word)
                .map(|&(_, weight)| weight)
        })
        .sum::<f64>()
        .clamp(-1.0, 1.0)
}

/// Label for a score.
#[must_use]
pub fn classify(score: f64) -> Sentiment {
    if score > NEUTRAL_BAND {
        Sentiment::Positive
    } else if score < -NEUTRAL_BAND {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Score `text` and label it.
#[must_use]
pub fn score_text(text: &str) -> (Sentiment, f64) {
    let score = lexicon_score(text);
    (classify(score), score)
}
