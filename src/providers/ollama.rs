use crate::config::ProviderConfig;
use crate::providers::{http_client, status_error, LlmProvider, ProviderError, SamplingParams};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Native Ollama backend serving the fine-tuned recipe model.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider from configuration
    pub fn new(config: &ProviderConfig, timeout_secs: Option<u64>) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        OllamaProvider {
            client: http_client(timeout_secs),
            base_url,
            model: config.model.clone(),
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaProvider {
            client: Client::new(),
            base_url,
            model,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
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
        // Ollama has no n-gram blocking; repeat_penalty is the closest knob.
        // The prompt carries its own instruction format, so raw mode skips the model template.
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "raw": true,
                "stream": false,
                "options": {
                    "temperature": temperature,
                    "top_p": params.top_p,
                    "top_k": params.top_k,
                    "repeat_penalty": params.repetition_penalty,
                    "num_predict": params.max_new_tokens,
                    "stop": params.stop,
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let response_body: Value = response.json().await?;
        debug!("Ollama response: {:?}", response_body);

        if let Some(error) = response_body.get("error") {
            let message = error.as_str().unwrap_or("Unknown error").to_string();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response_body["response"]
            .as_str()
            .map(|text| text.to_string())
            .ok_or_else(|| {
                ProviderError::ParseError(format!(
                    "missing 'response' field in Ollama reply: {}",
                    response_body
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_generate() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama-recipe",
                "raw": true,
                "stream": false,
                "options": {"top_k": 30, "num_predict": 180}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"model": "llama-recipe", "response": " Aloo Gobi\nSteps:\n1. Heat oil in a pan.", "done": true}"#,
            )
            .create_async()
            .await;

        let provider = OllamaProvider::with_base_url(server.url(), "llama-recipe".to_string());
        let result = provider
            .generate("prompt", 0.5, &SamplingParams::default())
            .await
            .unwrap();
        assert!(result.starts_with(" Aloo Gobi"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_rate_limited() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(429)
            .create_async()
            .await;

        let provider = OllamaProvider::with_base_url(server.url(), "llama-recipe".to_string());
        let result = provider
            .generate("prompt", 0.5, &SamplingParams::default())
            .await;
        assert!(matches!(result, Err(ProviderError::RateLimited)));
    }

    #[tokio::test]
    async fn test_generate_error_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "model 'llama-recipe' not found"}"#)
            .create_async()
            .await;

        let provider = OllamaProvider::with_base_url(server.url(), "llama-recipe".to_string());
        let err = provider
            .generate("prompt", 0.5, &SamplingParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_default_base_url() {
        let provider = OllamaProvider::new(&ProviderConfig::default(), Some(5));
        assert_eq!(provider.base_url, "http://localhost:11434");
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "llama-recipe");
    }
}
