//! Hashtag extraction.

use std::sync::LazyLock;

use regex::Regex;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));

/// Hashtags of `text` as written, `#` included, duplicates kept, in text order.
pub fn extract_hashtags(text: &str) -> impl Iterator<Item = &'_ str> + '_ {
    HASHTAG_RE.find_iter(text).map(|m| m.as_str())
}

/// Counting keys for the hashtags of `text`: lowercase, without the leading `#`.
pub fn hashtag_keys(text: &str) -> impl Iterator<Item = String> + '_ {
    extract_hashtags(text).map(|tag| tag[1..].to_lowercase())
}

/// Display form of a counting key.
#[must_use]
pub fn display_hashtag(key: &str) -> String {
    format!("#{key}")
}
