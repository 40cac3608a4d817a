use chrono::{Duration, Utc};
use pulse_core::{Record, Sentiment};

use super::*;

fn record(n: usize, text: &str, sentiment: Sentiment, synthetic: bool) -> Record {
    Record {
        id: format!("r{n}"),
        text: text.to_string(),
        author: format!("user{n}"),
        created_at: Utc::now() - Duration::seconds(i64::try_from(n).unwrap()),
        sentiment,
        sentiment_score: 0.0,
        is_synthetic: synthetic,
    }
}

#[test]
fn empty_batch_has_no_data_anywhere() {
    let snapshot = DashboardSnapshot::from_batch(&Batch::new(Vec::new()));
    assert_eq!(snapshot.record_count, 0);
    assert!(!snapshot.using_fallback_data);
    assert_eq!(snapshot.sentiment, Panel::NoData);
    assert_eq!(snapshot.hashtags, Panel::NoData);
    assert_eq!(snapshot.words, Panel::NoData);
}

#[test]
fn records_without_hashtags_or_long_words_leave_those_panels_empty() {
    let batch = Batch::new(vec![record(1, "ok so it is", Sentiment::Neutral, false)]);
    let snapshot = DashboardSnapshot::from_batch(&batch);
    assert!(snapshot.sentiment.has_data());
    assert!(!snapshot.hashtags.has_data());
    assert!(!snapshot.words.has_data());
}

#[test]
fn small_batch_is_partial() {
    let batch = Batch::new(vec![
        record(1, "#Rust compilers rock", Sentiment::Positive, false),
        record(2, "#rust compilers again", Sentiment::Positive, false),
        record(3, "#go routines", Sentiment::Negative, false),
    ]);
    let snapshot = DashboardSnapshot::from_batch(&batch);

    let Panel::Partial(tally) = &snapshot.sentiment else {
        panic!("expected partial tally, got {:?}", snapshot.sentiment);
    };
    assert_eq!(tally.positive, 2);
    assert_eq!(tally.negative, 1);

    let Panel::Partial(tags) = &snapshot.hashtags else {
        panic!("expected partial hashtags, got {:?}", snapshot.hashtags);
    };
    assert_eq!(tags[0].key, "rust");
    assert_eq!(tags[0].count, 2);
    assert_eq!(tags[1].key, "go");

    // Hashtag text also feeds the word cloud once `#` is stripped; ties keep
    // first-seen order.
    let words = snapshot.words.value().expect("words");
    assert_eq!(words[0].word, "rust");
    assert_eq!(words[1].word, "compilers");
    assert_eq!(words[1].count, 2);
}

#[test]
fn full_window_and_full_rankings_are_full() {
    let records: Vec<Record> = (0..50)
        .map(|n| {
            let text = format!("#tag{n} uniqueword{n} another{n}");
            record(n, &text, Sentiment::Neutral, false)
        })
        .collect();
    let snapshot = DashboardSnapshot::from_batch(&Batch::new(records));
    assert!(matches!(snapshot.sentiment, Panel::Full(_)));
    match &snapshot.hashtags {
        Panel::Full(tags) => assert_eq!(tags.len(), HASHTAG_LIMIT),
        other => panic!("expected full hashtags, got {other:?}"),
    }
    match &snapshot.words {
        Panel::Full(words) => assert_eq!(words.len(), WORD_LIMIT),
        other => panic!("expected full words, got {other:?}"),
    }
}

#[test]
fn fallback_flag_follows_batch() {
    let batch = Batch::new(vec![record(1, "seeded text here", Sentiment::Neutral, true)]);
    assert!(DashboardSnapshot::from_batch(&batch).using_fallback_data);
}

#[test]
fn word_cloud_carries_both_ranges() {
    let table = FrequencyTable::from_keys(["big", "big", "big", "small"]);
    let cloud = word_cloud(&table, WORD_LIMIT);
    assert!((cloud[0].font_size_rem - 1.5).abs() < 1e-9);
    assert!((cloud[0].opacity - 1.0).abs() < 1e-9);
    assert!((cloud[1].font_size_rem - 0.8).abs() < 1e-9);
    assert!((cloud[1].opacity - 0.5).abs() < 1e-9);
}

#[test]
fn panel_serializes_with_state_tag() {
    let panel: Panel<Vec<u32>> = Panel::Partial(vec![1]);
    let json = serde_json::to_value(&panel).unwrap();
    assert_eq!(json["state"], "partial");
    assert_eq!(json["value"][0], 1);
    let empty = serde_json::to_value(Panel::<Vec<u32>>::NoData).unwrap();
    assert_eq!(empty["state"], "no_data");
}
