//! Rule-based emotion tagging conditioned on a sentiment label.
//!
//! Matching is on whole lowercase words. Substring matching against the raw
//! text is not allowed: "sadly" must not trigger `sad`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{EmotionSet, SentimentLabel};

/// Emotion name and its trigger words. Multi-word triggers match as a
/// contiguous run of tokens.
pub type KeywordTable = &'static [(&'static str, &'static [&'static str])];

pub const POSITIVE_EMOTIONS: KeywordTable = &[
    (
        "happy",
        &[
            "happy", "joy", "excited", "cheerful", "delighted", "pleased", "thrilled", "glad",
        ],
    ),
    (
        "grateful",
        &["grateful", "thankful", "appreciative", "blessed", "great"],
    ),
    (
        "productive",
        &[
            "productive",
            "accomplished",
            "achieved",
            "completed",
            "finished",
            "successful",
        ],
    ),
    (
        "confident",
        &[
            "confident",
            "strong",
            "motivated",
            "determined",
            "focused",
            "energized",
        ],
    ),
];

pub const NEGATIVE_EMOTIONS: KeywordTable = &[
    (
        "sad",
        &["sad", "unhappy", "down", "depressed", "low", "heartbroken"],
    ),
    (
        "anxious",
        &[
            "anxious",
            "worried",
            "stress",
            "stressed",
            "nervous",
            "tense",
            "overthinking",
        ],
    ),
    (
        "frustrated",
        &["angry", "frustrated", "irritated", "annoyed", "fed up"],
    ),
    (
        "tired",
        &["tired", "exhausted", "burnt out", "drained", "fatigued"],
    ),
];

/// Letters, digits and in-word apostrophes (ASCII or typographic).
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['\u{2019}][\p{L}\p{N}]+)*")
        .expect("WORD_RE regex should compile")
});

/// Tokenised view of one text: the word set for single triggers, the ordered
/// sequence for phrases.
struct Tokens {
    sequence: Vec<String>,
    set: HashSet<String>,
}

impl Tokens {
    fn contains_trigger(&self, trigger: &str) -> bool {
        let mut words = trigger.split_whitespace();
        let first = match words.next() {
            Some(w) => w,
            None => return false,
        };
        let rest: Vec<&str> = words.collect();
        if rest.is_empty() {
            return self.set.contains(first);
        }
        self.sequence.windows(rest.len() + 1).any(|window| {
            window[0] == first && window[1..].iter().zip(&rest).all(|(a, b)| a == b)
        })
    }
}

/// Keyword-table tagger. Stateless after construction; safe to share.
#[derive(Debug, Clone, Copy)]
pub struct EmotionTagger {
    positive: KeywordTable,
    negative: KeywordTable,
}

impl EmotionTagger {
    pub fn new() -> Self {
        Self::with_tables(POSITIVE_EMOTIONS, NEGATIVE_EMOTIONS)
    }

    pub fn with_tables(positive: KeywordTable, negative: KeywordTable) -> Self {
        Self {
            positive,
            negative,
        }
    }

    pub fn tag(&self, text: &str, sentiment: SentimentLabel) -> EmotionSet {
        let table = match sentiment {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral | SentimentLabel::Error => return EmotionSet::neutral(),
        };

        let tokens = self.tokenize(text);
        let matched = table
            .iter()
            .filter(|(_, triggers)| triggers.iter().any(|t| tokens.contains_trigger(t)))
            .map(|(emotion, _)| *emotion);

        let emotions = EmotionSet::from_tags(matched);
        tracing::debug!(%sentiment, emotions = ?emotions, "Tagged emotions");
        emotions
    }

    fn tokenize(&self, text: &str) -> Tokens {
        let lower = text.to_lowercase();
        let sequence: Vec<String> = WORD_RE
            .find_iter(&lower)
            .map(|m| m.as_str().replace('\u{2019}', "'"))
            .collect();
        let set = sequence.iter().cloned().collect();
        Tokens { sequence, set }
    }
}

impl Default for EmotionTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str, sentiment: SentimentLabel) -> Vec<String> {
        EmotionTagger::new()
            .tag(text, sentiment)
            .iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_neutral_and_error_short_circuit() {
        assert_eq!(tags("I feel sad today", SentimentLabel::Neutral), vec!["neutral"]);
        assert_eq!(tags("I feel sad today", SentimentLabel::Error), vec!["neutral"]);
    }

    #[test]
    fn test_whole_word_only() {
        assert_eq!(tags("I am sadly mistaken", SentimentLabel::Negative), vec!["neutral"]);
        assert_eq!(tags("I feel sad today", SentimentLabel::Negative), vec!["sad"]);
    }

    #[test]
    fn test_substring_in_unrelated_token_ignored() {
        // "low" inside "flower", "down" inside "downtown"
        assert_eq!(
            tags("walked downtown past a flower shop", SentimentLabel::Negative),
            vec!["neutral"]
        );
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(tags("SAD. Really sad!", SentimentLabel::Negative), vec!["sad"]);
    }

    #[test]
    fn test_enumeration_order_and_single_count() {
        // "tired" and "stressed" and "anxious" all present; each emotion once, table order
        let got = tags("tired, stressed and anxious, so anxious", SentimentLabel::Negative);
        assert_eq!(got, vec!["anxious", "tired"]);
    }

    #[test]
    fn test_multi_word_triggers() {
        assert_eq!(tags("honestly I am fed up", SentimentLabel::Negative), vec!["frustrated"]);
        assert_eq!(tags("feeling burnt out", SentimentLabel::Negative), vec!["tired"]);
        // words present but not adjacent
        assert_eq!(
            tags("fed the cat then went up", SentimentLabel::Negative),
            vec!["neutral"]
        );
    }

    #[test]
    fn test_table_chosen_by_sentiment() {
        let text = "happy but tired";
        assert_eq!(tags(text, SentimentLabel::Positive), vec!["happy"]);
        assert_eq!(tags(text, SentimentLabel::Negative), vec!["tired"]);
    }

    #[test]
    fn test_multiple_positive_emotions() {
        assert_eq!(
            tags("I am so happy and grateful today", SentimentLabel::Positive),
            vec!["happy", "grateful"]
        );
    }

    #[test]
    fn test_apostrophes_stay_in_token() {
        // "don't" is one token, so "don" alone must not appear
        let tagger = EmotionTagger::new();
        let tokens = tagger.tokenize("I don't feel low");
        assert!(tokens.set.contains("don't"));
        assert!(tokens.set.contains("low"));
    }

    #[test]
    fn test_typographic_apostrophe_joins_token() {
        let tagger = EmotionTagger::new();
        let tokens = tagger.tokenize("I don\u{2019}t feel low");
        assert_eq!(tokens.sequence, vec!["i", "don't", "feel", "low"]);
        assert!(!tokens.set.contains("t"));
        assert_eq!(tags("I\u{2019}m so happy", SentimentLabel::Positive), vec!["happy"]);
    }
}
