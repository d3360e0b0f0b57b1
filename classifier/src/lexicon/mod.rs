//! Local lexicon-based sentiment scoring.
//!
//! [`LocalSentimentScorer`] maps a compound polarity from a [`PolarityModel`]
//! onto a label and confidence. It is pure and never fails.

pub mod vader;

use std::sync::Arc;

use crate::types::{SentimentLabel, SentimentScore};

pub use vader::VaderLexicon;

/// Compound polarity at or above this is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound polarity at or below this is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Anything that can reduce text to a compound polarity in `[-1, 1]`.
pub trait PolarityModel: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// Lexicon scorer with fixed label thresholds.
#[derive(Clone)]
pub struct LocalSentimentScorer {
    model: Arc<dyn PolarityModel>,
}

impl LocalSentimentScorer {
    /// Scorer over the full VADER lexicon.
    pub fn new() -> Self {
        Self::with_model(Arc::new(VaderLexicon::new()))
    }

    pub fn with_model(model: Arc<dyn PolarityModel>) -> Self {
        Self { model }
    }

    pub fn score(&self, text: &str) -> SentimentScore {
        let compound = self.model.compound(text);
        // a misbehaving model must not poison the pipeline
        let compound = if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        SentimentScore::new(label_for_compound(compound), compound.abs())
    }
}

impl Default for LocalSentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocalSentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSentimentScorer").finish_non_exhaustive()
    }
}

/// Threshold mapping; both boundaries are inclusive.
pub fn label_for_compound(compound: f64) -> SentimentLabel {
    if compound >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
