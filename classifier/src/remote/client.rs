//! Remote classifier with retry, response normalisation and label mapping.

use std::sync::Arc;

use crate::errors::ClassifyError;
use crate::resilience::{retry_with_backoff, RetryPolicy};
use crate::types::SentimentScore;

use super::backend::InferenceBackend;
use super::labels::LabelTable;
use super::response::{normalize_predictions, top_prediction};

/// Client for the escalation tier. Holds no per-request state, so one
/// instance can be shared across concurrent requests.
#[derive(Clone)]
pub struct RemoteClassifierClient {
    backend: Arc<dyn InferenceBackend>,
    labels: LabelTable,
    retry: RetryPolicy,
}

impl RemoteClassifierClient {
    pub fn new(backend: Arc<dyn InferenceBackend>, retry: RetryPolicy) -> Self {
        Self {
            backend,
            labels: LabelTable::default(),
            retry,
        }
    }

    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Classify with retries, never failing: any terminal error becomes
    /// `(error, 0.0)` and the caller picks the fallback.
    pub async fn classify(&self, text: &str) -> SentimentScore {
        match self.try_classify(text).await {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(model = self.model(), error = %e, "Remote classification failed");
                SentimentScore::error()
            }
        }
    }

    /// Classify with retries, surfacing the terminal error.
    ///
    /// Transient failures are retried per the policy and end as
    /// [`ClassifyError::ExhaustedRetries`]. Malformed responses are not retried.
    pub async fn try_classify(&self, text: &str) -> Result<SentimentScore, ClassifyError> {
        let outcome = retry_with_backoff(&self.retry, ClassifyError::is_retriable, move |attempt| {
            tracing::debug!(attempt, model = self.model(), "Calling remote classifier");
            self.attempt(text)
        })
        .await;

        match outcome.result {
            Ok(score) => {
                tracing::info!(
                    model = self.model(),
                    label = %score.label,
                    confidence = score.confidence,
                    attempts = outcome.attempts,
                    "Remote classification"
                );
                Ok(score)
            }
            Err(ClassifyError::Transient(last)) => Err(ClassifyError::ExhaustedRetries {
                attempts: outcome.attempts,
                last,
            }),
            Err(e) => Err(e),
        }
    }

    async fn attempt(&self, text: &str) -> Result<SentimentScore, ClassifyError> {
        let body = self.backend.infer(text).await?;
        let predictions = normalize_predictions(body)?;
        let top = top_prediction(&predictions)
            .ok_or_else(|| ClassifyError::malformed("no prediction with a usable score"))?;
        let label = self.labels.resolve(&top.label)?;
        Ok(SentimentScore::new(label, top.score))
    }
}

impl std::fmt::Debug for RemoteClassifierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClassifierClient")
            .field("model", &self.model())
            .field("labels", &self.labels)
            .field("retry", &self.retry)
            .finish()
    }
}
