//! VADER polarity via the `vader_sentiment` crate.
//!
//! The crate carries the full published lexicon (about 7,500 entries) and
//! the VADER heuristics: intensifiers, negation, ALL-CAPS emphasis, the
//! contrastive "but", punctuation emphasis and emoji descriptions.

use vader_sentiment::SentimentIntensityAnalyzer;

use super::PolarityModel;

const COMPOUND_KEY: &str = "compound";

/// Standard VADER analyzer over the embedded lexicon. Read-only after
/// construction, so one instance serves every request.
pub struct VaderLexicon {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderLexicon {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Number of scored entries in the lexicon.
    pub fn len(&self) -> usize {
        vader_sentiment::LEXICON.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VaderLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VaderLexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaderLexicon")
            .field("entries", &self.len())
            .finish()
    }
}

impl PolarityModel for VaderLexicon {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        self.analyzer
            .polarity_scores(text)
            .get(COMPOUND_KEY)
            .copied()
            .unwrap_or(0.0)
    }
}
