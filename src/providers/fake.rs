//! Fake generation backend for testing and offline runs.
//!
//! Responses are selected by prompt substring and, optionally, by temperature,
//! so tests run without network access or a model.

use super::{LlmProvider, ProviderError, SamplingParams};
use async_trait::async_trait;
use std::sync::Mutex;

const CANNED_RECIPE: &str = " Aloo Tamatar Sabzi
Steps:
1. Chop the potatoes, tomatoes and onions into small pieces.
2. Heat oil in a pan and add the chopped onions.
3. Cook the onions until they turn soft and golden.
4. Add the tomatoes and cook until they break down.
5. Add the potatoes with salt and stir well to coat.
6. Simmer covered for fifteen minutes until the potatoes are tender.
Calories: 320 calories";

/// A fake provider with deterministic responses.
///
/// Every call is recorded as `(prompt, temperature)` for later inspection.
#[derive(Debug, Default)]
pub struct FakeProvider {
    responses: Vec<(String, String)>,
    by_temperature: Vec<(f32, String)>,
    default_response: Option<String>,
    calls: Mutex<Vec<(String, f32)>>,
}

impl FakeProvider {
    /// Create a FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that always answers with a well formed recipe.
    pub fn with_canned_recipe() -> Self {
        Self::new().with_default_response(CANNED_RECIPE)
    }

    /// Respond with `response` for prompts containing `prompt_contains`.
    pub fn with_response(mut self, prompt_contains: &str, response: &str) -> Self {
        self.responses
            .push((prompt_contains.to_string(), response.to_string()));
        self
    }

    /// Respond with `response` for calls made at exactly `temperature`.
    pub fn with_temperature_response(mut self, temperature: f32, response: &str) -> Self {
        self.by_temperature
            .push((temperature, response.to_string()));
        self
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<(String, f32)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    fn provider_name(&self) -> &str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        _params: &SamplingParams,
    ) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), temperature));
        }

        if let Some((_, response)) = self
            .by_temperature
            .iter()
            .find(|(t, _)| (*t - temperature).abs() < f32::EPSILON)
        {
            return Ok(response.clone());
        }

        if let Some((_, response)) = self
            .responses
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
        {
            return Ok(response.clone());
        }

        self.default_response.clone().ok_or_else(|| {
            ProviderError::NotConfigured("no fake response registered for prompt".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_matches_prompt_substring() {
        let provider = FakeProvider::new()
            .with_response("paneer", "Paneer response")
            .with_default_response("default");

        let params = SamplingParams::default();
        assert_eq!(
            provider.generate("make paneer", 0.5, &params).await.unwrap(),
            "Paneer response"
        );
        assert_eq!(
            provider.generate("make dal", 0.5, &params).await.unwrap(),
            "default"
        );
    }

    #[tokio::test]
    async fn test_temperature_takes_precedence() {
        let provider = FakeProvider::new()
            .with_response("dal", "by prompt")
            .with_temperature_response(0.6, "by temperature");

        let params = SamplingParams::default();
        assert_eq!(
            provider.generate("dal", 0.6, &params).await.unwrap(),
            "by temperature"
        );
        assert_eq!(provider.generate("dal", 0.5, &params).await.unwrap(), "by prompt");
    }

    #[tokio::test]
    async fn test_no_response_is_error() {
        let provider = FakeProvider::new();
        let result = provider
            .generate("anything", 0.5, &SamplingParams::default())
            .await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_records_calls() {
        let provider = FakeProvider::with_canned_recipe();
        let params = SamplingParams::default();
        provider.generate("one", 0.5, &params).await.unwrap();
        provider.generate("two", 0.7, &params).await.unwrap();
        assert_eq!(
            provider.calls(),
            vec![("one".to_string(), 0.5), ("two".to_string(), 0.7)]
        );
    }
}
