//! Response normalisation for text-classification endpoints.
//!
//! Endpoints answer either with a flat list of `{label, score}` objects or
//! with one inner list per input. Both shapes collapse here into a single
//! `Vec<ScoredPrediction>` so nothing downstream sees the ambiguity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClassifyError;

/// One `(label, score)` pair as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPrediction {
    pub label: String,
    pub score: f64,
}

/// Normalise either response shape into one non-empty prediction list.
pub fn normalize_predictions(body: Value) -> Result<Vec<ScoredPrediction>, ClassifyError> {
    let mut outer = match body {
        Value::Array(items) => items,
        other => {
            return Err(ClassifyError::malformed(format!(
                "expected a list, got {}",
                value_kind(&other)
            )))
        }
    };

    // list-of-lists: we send one input, so only the first inner list matters
    let entries = if matches!(outer.first(), Some(Value::Array(_))) {
        match outer.swap_remove(0) {
            Value::Array(inner) => inner,
            _ => Vec::new(),
        }
    } else {
        outer
    };

    if entries.is_empty() {
        return Err(ClassifyError::malformed("empty prediction list"));
    }

    entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value::<ScoredPrediction>(entry)
                .map_err(|e| ClassifyError::malformed(format!("bad prediction entry: {e}")))
        })
        .collect()
}

/// The highest-scoring prediction. Ties keep the first; NaN never wins.
pub fn top_prediction(predictions: &[ScoredPrediction]) -> Option<&ScoredPrediction> {
    predictions.iter().fold(None, |best, p| match best {
        None if !p.score.is_nan() => Some(p),
        Some(b) if p.score > b.score => Some(p),
        other => other,
    })
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
