//! Tiered sentiment classification.
//!
//! A fast lexicon scorer answers when it is confident; otherwise the text
//! is escalated to a remote transformer classifier, with retries and a
//! fallback to the local answer. Every result carries a coarse set of
//! emotion tags derived from keyword tables.
//!
//! ```no_run
//! use sentiment_classifier::{ClassifierConfig, EscalationController};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClassifierConfig::from_env()?;
//! let controller = EscalationController::from_config(&config)?;
//! let result = controller.classify("I am so happy and grateful today").await;
//! println!("{} ({:.2}) via {}", result.label(), result.confidence(), result.source());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod emotion;
pub mod errors;
pub mod escalation;
pub mod lexicon;
pub mod remote;
pub mod resilience;
pub mod types;

pub use config::ClassifierConfig;
pub use emotion::EmotionTagger;
pub use errors::{ClassifyError, ConfigError};
pub use escalation::{EscalationController, EscalationStatsSnapshot};
pub use lexicon::{LocalSentimentScorer, PolarityModel, VaderLexicon};
pub use remote::{HttpInferenceBackend, InferenceBackend, RemoteClassifierClient};
pub use resilience::RetryPolicy;
pub use types::{
    ClassificationResult, EmotionSet, InvalidResult, SentimentLabel, SentimentScore, SourceTag,
};
