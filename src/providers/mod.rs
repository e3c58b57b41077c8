mod factory;
mod fake;
mod fallback;
mod ollama;
mod open_ai;

pub use factory::ProviderFactory;
pub use fake::FakeProvider;
pub use fallback::FallbackProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised at the generation engine boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited by generation backend")]
    RateLimited,

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("All providers failed:\n{0}")]
    AllProvidersFailed(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::RequestFailed(err.to_string())
    }
}

/// Sampling parameters passed with every generation call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    pub max_new_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    pub no_repeat_ngram_size: u32,
    pub num_return_sequences: u32,
    /// Strings at which the backend should stop generating
    pub stop: Vec<String>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 180,
            top_p: 0.75,
            top_k: 30,
            repetition_penalty: 1.3,
            no_repeat_ngram_size: 4,
            num_return_sequences: 1,
            stop: [
                "###",
                "Calorie ratio",
                "WARNING",
                "MEAL_TYPE",
                "Cuisine:",
                "diet:",
                "Note:",
                "Tip:",
                "Serving:",
                "Variation:",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// A text generation backend.
///
/// Implementations must be safe to call concurrently and free of side effects
/// visible to the caller, so a failed call can simply be retried.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "ollama", "openai")
    fn provider_name(&self) -> &str;

    /// Get the model name as known by the backend
    fn model_name(&self) -> &str;

    /// Produce raw text continuing `prompt`
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        params: &SamplingParams,
    ) -> Result<String, ProviderError>;
}

/// A shared provider is still a provider.
#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for Arc<P> {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        params: &SamplingParams,
    ) -> Result<String, ProviderError> {
        (**self).generate(prompt, temperature, params).await
    }
}

/// Build an HTTP client with the configured request timeout.
pub(crate) fn http_client(timeout_secs: Option<u64>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Map a non-success HTTP status to a provider error.
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited
    } else {
        ProviderError::ApiError {
            status: status.as_u16(),
            message: body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_defaults() {
        let params = SamplingParams::default();
        assert_eq!(params.max_new_tokens, 180);
        assert_eq!(params.top_p, 0.75);
        assert_eq!(params.top_k, 30);
        assert_eq!(params.repetition_penalty, 1.3);
        assert_eq!(params.no_repeat_ngram_size, 4);
        assert_eq!(params.num_return_sequences, 1);
        assert!(params.stop.contains(&"###".to_string()));
        assert_eq!(params.stop.len(), 10);
    }

    #[test]
    fn test_status_error_mapping() {
        let limited = status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(matches!(limited, ProviderError::RateLimited));

        let other = status_error(reqwest::StatusCode::BAD_GATEWAY, "down".to_string());
        match other {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "down");
            }
            e => panic!("unexpected error: {e}"),
        }
    }
}
