use crate::config::{AppConfig, ProviderConfig};
use crate::providers::{FakeProvider, LlmProvider, OllamaProvider, OpenAIProvider, ProviderError};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout_secs: Option<u64>,
    ) -> Result<Box<dyn LlmProvider>, ProviderError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(ProviderError::NotConfigured(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "ollama" => Ok(Box::new(OllamaProvider::new(config, timeout_secs))),
            "openai" => Ok(Box::new(OpenAIProvider::new(config, timeout_secs))),
            "fake" => Ok(Box::new(FakeProvider::with_canned_recipe())),
            _ => Err(ProviderError::NotConfigured(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(config: &AppConfig) -> Result<Box<dyn LlmProvider>, ProviderError> {
        let provider_name = &config.default_provider;
        let provider_config = config.providers.get(provider_name).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        Self::create(provider_name, provider_config, Some(config.timeout))
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["ollama", "openai", "fake"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_provider_config() -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "test-model".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: None,
        }
    }

    #[test]
    fn test_create_ollama_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("ollama", &config, None).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "test-model");
    }

    #[test]
    fn test_create_openai_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("openai", &config, Some(10)).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_fake_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("fake", &config, None).unwrap();
        assert_eq!(provider.provider_name(), "fake");
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = create_test_provider_config();
        let result = ProviderFactory::create("unknown", &config, None);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Unknown provider"));
        }
    }

    #[test]
    fn test_create_disabled_provider() {
        let mut config = create_test_provider_config();
        config.enabled = false;

        let result = ProviderFactory::create("ollama", &config, None);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not enabled in configuration"));
        }
    }

    #[test]
    fn test_get_default_provider() {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), create_test_provider_config());

        let config = AppConfig {
            default_provider: "openai".to_string(),
            providers,
            ..AppConfig::default()
        };

        let provider = ProviderFactory::get_default_provider(&config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_get_default_provider_not_found() {
        let config = AppConfig {
            default_provider: "openai".to_string(),
            providers: HashMap::new(),
            ..AppConfig::default()
        };

        let result = ProviderFactory::get_default_provider(&config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not found"));
        }
    }

    #[test]
    fn test_available_providers() {
        let providers = ProviderFactory::available_providers();
        assert_eq!(providers.len(), 3);
        assert!(providers.contains(&"ollama"));
        assert!(providers.contains(&"openai"));
        assert!(providers.contains(&"fake"));
    }
}
