//! Process-wide configuration, read once at startup and immutable afterwards.
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional
//! TOML file, then environment variables. Any invalid or missing required
//! value is a [`ConfigError`]; the process must not start serving.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::resilience::RetryPolicy;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.70;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REMOTE_URL: &str = "https://router.huggingface.co/hf-inference";
pub const DEFAULT_REMOTE_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment";

pub const ENV_THRESHOLD: &str = "SENTIMENT_CONFIDENCE_THRESHOLD";
pub const ENV_RETRIES: &str = "SENTIMENT_REMOTE_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "SENTIMENT_RETRY_DELAY_MS";
pub const ENV_TIMEOUT_SECS: &str = "SENTIMENT_REMOTE_TIMEOUT_SECS";
pub const ENV_REMOTE_URL: &str = "SENTIMENT_REMOTE_URL";
pub const ENV_REMOTE_MODEL: &str = "SENTIMENT_REMOTE_MODEL";
pub const ENV_API_TOKEN: &str = "HF_TOKEN";

/// Validated configuration for the whole pipeline.
#[derive(Clone)]
pub struct ClassifierConfig {
    /// Local confidence at or above this skips the remote call.
    pub confidence_threshold: f64,
    pub retry: RetryPolicy,
    /// Per-attempt network timeout.
    pub request_timeout: Duration,
    pub remote_url: String,
    pub remote_model: String,
    pub api_token: String,
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("confidence_threshold", &self.confidence_threshold)
            .field("retry", &self.retry)
            .field("request_timeout", &self.request_timeout)
            .field("remote_url", &self.remote_url)
            .field("remote_model", &self.remote_model)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Unvalidated settings as they appear in a TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    confidence_threshold: Option<f64>,
    max_attempts: Option<u32>,
    retry_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    remote_url: Option<String>,
    remote_model: Option<String>,
    api_token: Option<String>,
}

impl ClassifierConfig {
    /// Load from an optional TOML file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load from an optional TOML file plus an environment lookup.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let contents = match path {
            Some(p) => Some(std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                path: p.to_path_buf(),
                source,
            })?),
            None => None,
        };
        Self::from_sources(contents.as_deref(), env)
    }

    /// Environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Build from TOML text (if any) and an environment lookup.
    pub fn from_sources<F>(toml_text: Option<&str>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut raw: RawConfig = match toml_text {
            Some(text) => toml::from_str(text)?,
            None => RawConfig::default(),
        };
        raw.apply_env(env)?;
        raw.validate()
    }
}

impl RawConfig {
    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env(ENV_THRESHOLD) {
            self.confidence_threshold = Some(parse_env(ENV_THRESHOLD, &v)?);
        }
        if let Some(v) = env(ENV_RETRIES) {
            self.max_attempts = Some(parse_env(ENV_RETRIES, &v)?);
        }
        if let Some(v) = env(ENV_RETRY_DELAY_MS) {
            self.retry_delay_ms = Some(parse_env(ENV_RETRY_DELAY_MS, &v)?);
        }
        if let Some(v) = env(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = Some(parse_env(ENV_TIMEOUT_SECS, &v)?);
        }
        if let Some(v) = env(ENV_REMOTE_URL) {
            self.remote_url = Some(v);
        }
        if let Some(v) = env(ENV_REMOTE_MODEL) {
            self.remote_model = Some(v);
        }
        if let Some(v) = env(ENV_API_TOKEN) {
            self.api_token = Some(v);
        }
        Ok(())
    }

    fn validate(self) -> Result<ClassifierConfig, ConfigError> {
        let confidence_threshold = self
            .confidence_threshold
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);
        if !(0.0..=1.0).contains(&confidence_threshold) {
            return Err(ConfigError::invalid(
                "confidence_threshold",
                format!("{confidence_threshold} is outside [0, 1]"),
            ));
        }

        let retry = RetryPolicy::new(
            self.max_attempts.unwrap_or(RetryPolicy::DEFAULT_MAX_ATTEMPTS),
            self.retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(RetryPolicy::DEFAULT_DELAY),
        )?;

        let request_timeout = self
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "request_timeout_secs",
                "a per-attempt timeout is required",
            ));
        }

        let api_token = self
            .api_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        let remote_model = self
            .remote_model
            .unwrap_or_else(|| DEFAULT_REMOTE_MODEL.to_string());
        if remote_model.trim().is_empty() {
            return Err(ConfigError::invalid("remote_model", "must not be empty"));
        }

        Ok(ClassifierConfig {
            confidence_threshold,
            retry,
            request_timeout,
            remote_url: self
                .remote_url
                .unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string()),
            remote_model,
            api_token,
        })
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, format!("{value:?}: {e}")))
}
