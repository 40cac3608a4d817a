//! Word tokenizer for the word cloud.

use std::str::SplitWhitespace;
use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z][a-z0-9]*://\S+").expect("valid url regex"));
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));

/// Common words that carry no topical signal.
pub const STOPWORDS: [&str; 11] = [
    "this", "that", "with", "from", "have", "they", "will", "what", "when", "where", "which",
];

/// Tokens of this many characters or fewer are dropped.
const MAX_DROPPED_LEN: usize = 3;

/// Normalized word tokens of one text.
///
/// Cleanup (lowercasing, URL and punctuation removal) happens once on
/// construction; splitting and filtering happen lazily on every call to
/// [`Tokens::iter`], so the sequence can be walked any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    cleaned: String,
}

impl Tokens {
    #[must_use]
    pub fn iter(&self) -> TokenIter<'_> {
        TokenIter {
            words: self.cleaned.split_whitespace(),
        }
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a str;
    type IntoIter = TokenIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over kept tokens, in text order, duplicates included.
#[derive(Debug, Clone)]
pub struct TokenIter<'a> {
    words: SplitWhitespace<'a>,
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.words.by_ref().find(|word| is_kept(word))
    }
}

/// Tokenize one text.
#[must_use]
pub fn tokenize(text: &str) -> Tokens {
    let lowered = text.to_lowercase();
    let without_urls = URL_RE.replace_all(&lowered, "");
    let cleaned = NON_WORD_RE.replace_all(&without_urls, "").into_owned();
    Tokens { cleaned }
}

fn is_kept(word: &str) -> bool {
    word.chars().count() > MAX_DROPPED_LEN && !STOPWORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<String> {
        tokenize(text).iter().map(str::to_owned).collect()
    }

    #[test]
    fn strips_url_stopword_and_short_tokens() {
        assert_eq!(
            collect("Check this out: https://x.co #great"),
            vec!["check", "great"]
        );
    }

    #[test]
    fn empty_and_whitespace_text_yield_nothing() {
        assert!(collect("").is_empty());
        assert!(collect("   \n\t  ").is_empty());
    }

    #[test]
    fn keeps_duplicates_in_text_order() {
        assert_eq!(
            collect("Rust rust RUST compiler"),
            vec!["rust", "rust", "rust", "compiler"]
        );
    }

    #[test]
    fn punctuation_inside_words_is_removed_not_split() {
        assert_eq!(collect("don't can't self-driving"), vec!["dont", "cant", "selfdriving"]);
    }

    #[test]
    fn underscores_survive_as_word_characters() {
        assert_eq!(collect("snake_case"), vec!["snake_case"]);
    }

    #[test]
    fn any_scheme_url_is_removed() {
        assert_eq!(
            collect("mirror ftp://files.example.org/pub/file.tar release"),
            vec!["mirror", "release"]
        );
    }

    #[test]
    fn word_glued_to_a_url_survives() {
        assert_eq!(
            collect("amazing.https://x.co/a release"),
            vec!["amazing", "release"]
        );
        assert_eq!(collect("launch-day:https://x.co"), vec!["launchday"]);
        assert_eq!(collect("news+https://x.co/b"), vec!["news"]);
    }

    #[test]
    fn multibyte_letters_count_as_characters() {
        // "café" is four characters even though it is five bytes.
        assert_eq!(collect("café naïve été"), vec!["café", "naïve"]);
    }

    #[test]
    fn sequence_is_restartable() {
        let tokens = tokenize("streaming analytics pipeline");
        let first: Vec<&str> = tokens.iter().collect();
        let second: Vec<&str> = (&tokens).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn every_token_satisfies_the_filter_rules() {
        let text = "This IS a Wild-ride!! with WHICH where, http://t.co/abc SOMETHING über  ok";
        for token in tokenize(text).iter() {
            assert_eq!(token, token.to_lowercase());
            assert!(!token.chars().any(char::is_whitespace));
            assert!(token.chars().count() > 3, "{token} too short");
            assert!(!STOPWORDS.contains(&token), "{token} is a stopword");
        }
    }
}
