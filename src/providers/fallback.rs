use crate::config::AppConfig;
use crate::providers::{LlmProvider, ProviderError, ProviderFactory, SamplingParams};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

pub struct FallbackProvider {
    providers: Vec<Box<dyn LlmProvider>>,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl FallbackProvider {
    /// Create a new fallback provider from configuration
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        if !config.fallback.enabled {
            // Without fallback the default provider gets exactly one attempt
            let default_provider = ProviderFactory::get_default_provider(config)?;
            return Ok(Self::from_providers(vec![default_provider], 1, 0));
        }

        let mut providers = Vec::new();

        // Create providers in fallback order
        for provider_name in &config.fallback.order {
            if let Some(provider_config) = config.providers.get(provider_name) {
                if provider_config.enabled {
                    match ProviderFactory::create(
                        provider_name,
                        provider_config,
                        Some(config.timeout),
                    ) {
                        Ok(provider) => {
                            info!("Added '{}' to fallback chain", provider_name);
                            providers.push(provider);
                        }
                        Err(e) => {
                            warn!("Failed to initialize provider '{}': {}", provider_name, e);
                        }
                    }
                }
            } else {
                warn!(
                    "Provider '{}' in fallback order not found in configuration",
                    provider_name
                );
            }
        }

        if providers.is_empty() {
            return Err(ProviderError::NotConfigured(
                "No providers available in fallback configuration".to_string(),
            ));
        }

        Ok(Self::from_providers(
            providers,
            config.fallback.retry_attempts,
            config.fallback.retry_delay_ms,
        ))
    }

    /// Build a chain from already constructed providers
    pub fn from_providers(
        providers: Vec<Box<dyn LlmProvider>>,
        retry_attempts: u32,
        retry_delay_ms: u64,
    ) -> Self {
        FallbackProvider {
            providers,
            retry_attempts: retry_attempts.max(1),
            retry_delay_ms,
        }
    }

    /// Try a provider with increasing delay between attempts
    async fn try_provider_with_retry(
        &self,
        provider: &dyn LlmProvider,
        prompt: &str,
        temperature: f32,
        params: &SamplingParams,
    ) -> Result<String, ProviderError> {
        let mut attempt = 1;

        loop {
            debug!(
                "Generating with {} at temperature {} (attempt {}/{})",
                provider.provider_name(),
                temperature,
                attempt,
                self.retry_attempts
            );

            match provider.generate(prompt, temperature, params).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(
                        "Provider {} failed (attempt {}/{}): {}",
                        provider.provider_name(),
                        attempt,
                        self.retry_attempts,
                        e
                    );
                    if attempt >= self.retry_attempts {
                        return Err(e);
                    }
                }
            }

            let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
            debug!("Waiting {:?} before retry", delay);
            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl LlmProvider for FallbackProvider {
    fn provider_name(&self) -> &str {
        if self.providers.len() == 1 {
            self.providers[0].provider_name()
        } else {
            "fallback"
        }
    }

    fn model_name(&self) -> &str {
        self.providers
            .first()
            .map(|p| p.model_name())
            .unwrap_or("none")
    }

    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        params: &SamplingParams,
    ) -> Result<String, ProviderError> {
        let mut all_errors: Vec<(String, ProviderError)> = Vec::new();

        for provider in &self.providers {
            match self
                .try_provider_with_retry(provider.as_ref(), prompt, temperature, params)
                .await
            {
                Ok(text) => {
                    if !all_errors.is_empty() {
                        info!("Generated text using {}", provider.provider_name());
                    }
                    return Ok(text);
                }
                Err(e) => all_errors.push((provider.provider_name().to_string(), e)),
            }
        }

        if all_errors.len() == 1 {
            if let Some((_, e)) = all_errors.pop() {
                return Err(e);
            }
        }

        let summary = all_errors
            .iter()
            .map(|(name, e)| format!("{}: {}", name, e))
            .collect::<Vec<_>>()
            .join("\n");
        Err(ProviderError::AllProvidersFailed(summary))
    }
}
