//! Mapping from model-specific label tokens to [`SentimentLabel`].

use std::collections::HashMap;

use crate::errors::ClassifyError;
use crate::types::SentimentLabel;

/// Fixed three-way label table for a remote model.
#[derive(Debug, Clone)]
pub struct LabelTable {
    map: HashMap<String, SentimentLabel>,
}

impl LabelTable {
    /// Table for RoBERTa-style checkpoints that emit `LABEL_0..LABEL_2`.
    pub fn roberta() -> Self {
        Self::from_pairs([
            ("LABEL_0", SentimentLabel::Negative),
            ("LABEL_1", SentimentLabel::Neutral),
            ("LABEL_2", SentimentLabel::Positive),
        ])
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, SentimentLabel)>,
        S: Into<String>,
    {
        Self {
            map: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Resolve a raw model label.
    ///
    /// Unmapped labels pass through unchanged and are read as a polarity
    /// name; anything else breaks the response contract.
    pub fn resolve(&self, raw: &str) -> Result<SentimentLabel, ClassifyError> {
        if let Some(label) = self.map.get(raw) {
            return Ok(*label);
        }
        tracing::warn!(raw_label = raw, "Unmapped remote label, passing through");
        raw.parse::<SentimentLabel>()
            .map_err(|e| ClassifyError::malformed(e.to_string()))
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::roberta()
    }
}
