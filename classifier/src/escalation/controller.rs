//! Escalation Controller — confidence-gated routing between tiers.
//!
//! Scores locally, accepts the local answer when it is confident enough,
//! otherwise asks the remote classifier and falls back to the local answer
//! if the remote path fails. Emotions are tagged from whichever label won.

use std::sync::Arc;

use crate::config::ClassifierConfig;
use crate::emotion::EmotionTagger;
use crate::errors::ConfigError;
use crate::lexicon::LocalSentimentScorer;
use crate::remote::{HttpInferenceBackend, RemoteClassifierClient};
use crate::types::{ClassificationResult, SentimentScore, SourceTag};

use super::state::{EscalationStage, EscalationTrace};
use super::stats::{EscalationStats, EscalationStatsSnapshot};

/// Orchestrates one classification request end to end.
///
/// All dependencies are injected; the controller itself holds only
/// read-only configuration and process-wide counters, so it can be cloned
/// and shared between concurrent requests.
#[derive(Debug, Clone)]
pub struct EscalationController {
    scorer: LocalSentimentScorer,
    remote: RemoteClassifierClient,
    tagger: EmotionTagger,
    threshold: f64,
    stats: Arc<EscalationStats>,
}

impl EscalationController {
    pub fn new(
        scorer: LocalSentimentScorer,
        remote: RemoteClassifierClient,
        tagger: EmotionTagger,
        threshold: f64,
    ) -> Self {
        Self {
            scorer,
            remote,
            tagger,
            threshold: threshold.clamp(0.0, 1.0),
            stats: Arc::new(EscalationStats::default()),
        }
    }

    /// Production wiring: lexicon scorer, HTTP backend, default keyword tables.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        let backend = HttpInferenceBackend::from_config(config)?;
        let remote = RemoteClassifierClient::new(Arc::new(backend), config.retry);
        Ok(Self::new(
            LocalSentimentScorer::new(),
            remote,
            EmotionTagger::new(),
            config.confidence_threshold,
        ))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn stats(&self) -> EscalationStatsSnapshot {
        self.stats.snapshot()
    }

    /// Classify `text`. Never fails: remote trouble degrades to the local score.
    ///
    /// The caller is expected to have rejected empty or whitespace-only text.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        self.classify_with_trace(text).await.0
    }

    /// Like [`classify`](Self::classify), also returning the stage path taken.
    pub async fn classify_with_trace(&self, text: &str) -> (ClassificationResult, EscalationTrace) {
        let mut trace = EscalationTrace::new();

        let local = self.scorer.score(text);
        trace.advance(EscalationStage::LocalScored);
        tracing::debug!(
            label = %local.label,
            confidence = local.confidence,
            threshold = self.threshold,
            "Local score"
        );

        let (score, stage) = if local.confidence >= self.threshold {
            (local, EscalationStage::Accepted)
        } else {
            trace.advance(EscalationStage::Escalating);
            tracing::info!(
                confidence = local.confidence,
                threshold = self.threshold,
                model = self.remote.model(),
                "Local score uncertain, escalating"
            );
            self.resolve_remote(text, local).await
        };
        trace.advance(stage);

        let source = stage.source().unwrap_or(SourceTag::LocalFallback);
        let result = self.finish(text, score, source);
        trace.advance(EscalationStage::Done);

        (result, trace)
    }

    async fn resolve_remote(
        &self,
        text: &str,
        local: SentimentScore,
    ) -> (SentimentScore, EscalationStage) {
        let remote = self.remote.classify(text).await;
        if remote.is_error() {
            tracing::warn!(
                label = %local.label,
                confidence = local.confidence,
                "Remote tier failed, falling back to local score"
            );
            (local, EscalationStage::RemoteFallback)
        } else {
            (remote, EscalationStage::RemoteAccepted)
        }
    }

    fn finish(&self, text: &str, score: SentimentScore, source: SourceTag) -> ClassificationResult {
        let emotions = self.tagger.tag(text, score.label);
        self.stats.record(source);
        ClassificationResult::new(score, source, emotions)
    }
}
