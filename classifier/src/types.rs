//! Core data model shared by every stage of the pipeline.
//!
//! All values here are created per request and dropped once the result has
//! been handed back to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Polarity label produced by either the local scorer or the remote model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// No usable signal. Only surfaces through the remote path's failure value.
    Error,
}

impl SentimentLabel {
    /// Whether this label carries an emotion keyword table.
    pub fn is_polar(self) -> bool {
        matches!(self, Self::Positive | Self::Negative)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Error returned when a string is not one of the three polarity names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized sentiment label: {0:?}")]
pub struct UnknownLabel(pub String);

impl FromStr for SentimentLabel {
    type Err = UnknownLabel;

    /// Parses `positive` / `negative` / `neutral`, case-insensitively.
    ///
    /// `error` is deliberately rejected: it is a local sentinel, never
    /// something a remote model is allowed to report.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

/// A label with its confidence magnitude in `[0.0, 1.0]`.
///
/// Confidence is not a probability; the local and remote sources do not
/// share a normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl SentimentScore {
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// The terminal failure value of the remote path.
    pub fn error() -> Self {
        Self {
            label: SentimentLabel::Error,
            confidence: 0.0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.label == SentimentLabel::Error
    }
}

/// Which component produced the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTag {
    /// Local scorer was confident enough on its own.
    Local,
    /// Remote classifier's answer was used.
    Remote,
    /// Remote path failed terminally; degraded to the local score.
    LocalFallback,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
            Self::LocalFallback => write!(f, "local-fallback"),
        }
    }
}

/// Error returned when serialized data violates a result invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid classification data: {0}")]
pub struct InvalidResult(pub String);

/// Ordered, duplicate-free, never-empty set of emotion tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct EmotionSet(Vec<String>);

impl EmotionSet {
    pub const NEUTRAL: &'static str = "neutral";

    /// The `{"neutral"}` sentinel.
    pub fn neutral() -> Self {
        Self(vec![Self::NEUTRAL.to_string()])
    }

    /// Build from tags in enumeration order. Empty input yields the sentinel.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
        if out.is_empty() {
            Self::neutral()
        } else {
            Self(out)
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn is_neutral(&self) -> bool {
        self.0.len() == 1 && self.0[0] == Self::NEUTRAL
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for EmotionSet {
    type Error = InvalidResult;

    fn try_from(tags: Vec<String>) -> Result<Self, Self::Error> {
        if tags.is_empty() {
            return Err(InvalidResult("emotion set must not be empty".into()));
        }
        for (i, tag) in tags.iter().enumerate() {
            if tag.trim().is_empty() {
                return Err(InvalidResult("emotion tag must not be blank".into()));
            }
            if tags[..i].contains(tag) {
                return Err(InvalidResult(format!("duplicate emotion tag {tag:?}")));
            }
        }
        Ok(Self(tags))
    }
}

impl From<EmotionSet> for Vec<String> {
    fn from(set: EmotionSet) -> Self {
        set.0
    }
}

/// The unit returned to callers of the pipeline. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClassificationResult")]
pub struct ClassificationResult {
    #[serde(rename = "sentiment")]
    label: SentimentLabel,
    confidence: f64,
    source: SourceTag,
    emotions: EmotionSet,
}

impl ClassificationResult {
    pub fn new(score: SentimentScore, source: SourceTag, emotions: EmotionSet) -> Self {
        Self {
            label: score.label,
            confidence: score.confidence,
            source,
            emotions,
        }
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    pub fn emotions(&self) -> &EmotionSet {
        &self.emotions
    }
}

/// Wire form of [`ClassificationResult`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClassificationResult {
    sentiment: SentimentLabel,
    confidence: f64,
    source: SourceTag,
    emotions: EmotionSet,
}

impl TryFrom<RawClassificationResult> for ClassificationResult {
    type Error = InvalidResult;

    fn try_from(raw: RawClassificationResult) -> Result<Self, Self::Error> {
        if raw.sentiment == SentimentLabel::Error {
            return Err(InvalidResult("a final result cannot carry the error label".into()));
        }
        if !(0.0..=1.0).contains(&raw.confidence) {
            return Err(InvalidResult(format!(
                "confidence {} is outside [0, 1]",
                raw.confidence
            )));
        }
        Ok(Self {
            label: raw.sentiment,
            confidence: raw.confidence,
            source: raw.source,
            emotions: raw.emotions,
        })
    }
}
