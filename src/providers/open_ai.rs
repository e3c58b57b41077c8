use crate::config::ProviderConfig;
use crate::providers::{http_client, status_error, LlmProvider, ProviderError, SamplingParams};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// OpenAI-compatible text completion backend (vLLM, TGI and friends).
pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAIProvider {
    /// Create a new provider from configuration
    pub fn new(config: &ProviderConfig, timeout_secs: Option<u64>) -> Self {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok());

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        OpenAIProvider {
            client: http_client(timeout_secs),
            api_key,
            base_url,
            model: config.model.clone(),
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        params: &SamplingParams,
    ) -> Result<String, ProviderError> {
        let mut request = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "temperature": temperature,
                "top_p": params.top_p,
                "top_k": params.top_k,
                "repetition_penalty": params.repetition_penalty,
                "max_tokens": params.max_new_tokens,
                "n": params.num_return_sequences,
                "stop": params.stop,
            }));

        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        response_body["choices"][0]["text"]
            .as_str()
            .map(|text| text.to_string())
            .ok_or_else(|| {
                ProviderError::ParseError(
                    "Failed to extract text from completion response".to_string(),
                )
            })
    }
}
