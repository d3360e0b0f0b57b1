//! Error taxonomy for the classification pipeline.
//!
//! ## Remote path
//!
//! | Variant            | Retriable | Outcome                              |
//! |--------------------|-----------|--------------------------------------|
//! | Transient          | yes       | retried up to `RetryPolicy`          |
//! | MalformedResponse  | no        | terminal, degrades to local fallback |
//! | ExhaustedRetries   | no        | terminal, degrades to local fallback |
//!
//! None of these reach the caller of `EscalationController::classify`; the
//! only caller-visible failure is a [`ConfigError`] at startup.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of one remote classification attempt, or of the whole retry run.
#[derive(Debug, Clone, Error)]
pub enum ClassifyError {
    /// Network, timeout, or non-2xx status. Safe to retry.
    #[error("transient remote failure: {0}")]
    Transient(String),

    /// The endpoint answered but broke the response contract.
    #[error("malformed remote response: {0}")]
    MalformedResponse(String),

    /// Every attempt failed transiently.
    #[error("remote classifier unavailable after {attempts} attempts: {last}")]
    ExhaustedRetries { attempts: u32, last: String },
}

impl ClassifyError {
    /// Returns `true` if another attempt may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

/// Startup misconfiguration. Fatal: the process must not serve requests.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("remote credential not configured (set HF_TOKEN or api_token)")]
    MissingCredential,

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_is_retriable() {
        let err = ClassifyError::transient("connection reset");
        assert!(err.is_retriable());
    }

    #[test]
    fn malformed_is_terminal() {
        let err = ClassifyError::malformed("empty list");
        assert!(!err.is_retriable());
    }

    #[test]
    fn exhausted_is_terminal() {
        let err = ClassifyError::ExhaustedRetries {
            attempts: 3,
            last: "timeout".into(),
        };
        assert!(!err.is_retriable());
        assert!(err.to_string().contains("3 attempts"));
    }

    #[test]
    fn invalid_config_names_key() {
        let err = ConfigError::invalid("confidence_threshold", "must be within [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid value for confidence_threshold: must be within [0, 1]"
        );
    }
}
