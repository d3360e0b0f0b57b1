//! Transport for a single remote inference attempt.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClassifierConfig;
use crate::errors::{ClassifyError, ConfigError};

/// Longest slice of an error body kept in a log line.
const MAX_ERROR_BODY: usize = 256;

/// One request/response round trip to a text-classification endpoint.
///
/// Implementations make exactly one attempt and classify the failure; the
/// retry loop lives in [`super::RemoteClassifierClient`].
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send `text`, return the decoded JSON body.
    async fn infer(&self, text: &str) -> Result<Value, ClassifyError>;

    /// Model identifier the backend is bound to.
    fn model(&self) -> &str;
}

/// Hosted inference API over HTTPS.
///
/// `POST {base_url}/models/{model}` with `{"inputs": text}` and a bearer
/// credential. The per-attempt timeout is set on the underlying client.
pub struct HttpInferenceBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_token: String,
}

impl HttpInferenceBackend {
    pub fn new(
        base_url: &str,
        model: &str,
        api_token: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model),
            model: model.to_string(),
            api_token: api_token.to_string(),
        })
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.remote_url,
            &config.remote_model,
            &config.api_token,
            config.request_timeout,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpInferenceBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInferenceBackend")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceBackend {
    async fn infer(&self, text: &str) -> Result<Value, ClassifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifyError::transient(format!("request timed out: {e}"))
                } else {
                    ClassifyError::transient(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::transient(format!(
                "HTTP {}: {}",
                status,
                truncate(&body, MAX_ERROR_BODY)
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClassifyError::transient(format!("failed to read body: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ClassifyError::malformed(format!("body is not JSON: {e}")))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let backend = HttpInferenceBackend::new(
            "https://example.test/hf-inference/",
            "org/model",
            "tok",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            backend.endpoint(),
            "https://example.test/hf-inference/models/org/model"
        );
        assert_eq!(backend.model(), "org/model");
    }

    #[test]
    fn test_debug_hides_credential() {
        let backend =
            HttpInferenceBackend::new("http://x", "m", "secret-token", Duration::from_secs(1))
                .unwrap();
        assert!(!format!("{:?}", backend).contains("secret-token"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
