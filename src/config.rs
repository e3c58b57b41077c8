use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

use crate::providers::SamplingParams;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Provider used when fallback is disabled
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Temperature schedule and sampling parameters
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Request timeout in seconds for calls to the generation engine
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            default_provider: default_provider(),
            providers: default_providers(),
            fallback: FallbackConfig::default(),
            generation: GenerationSettings::default(),
            timeout: default_timeout(),
        }
    }
}

/// Address the service binds to
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for a specific generation backend
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier as known by the backend (e.g. "llama-recipe")
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for the backend
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Configuration for provider fallback and retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of attempts per provider before moving on
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base delay between retries in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// How many candidates to generate per request and how to sample them
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Recipes returned by `POST /generate-recipe`
    #[serde(default = "default_recipes_per_request")]
    pub recipes_per_request: usize,
    /// One generation call is made per temperature, in order
    #[serde(default = "default_temperatures")]
    pub temperatures: Vec<f32>,
    #[serde(default)]
    pub sampling: SamplingParams,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            recipes_per_request: default_recipes_per_request(),
            temperatures: default_temperatures(),
            sampling: SamplingParams::default(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "ollama".to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert("ollama".to_string(), ProviderConfig::default());
    providers
}

fn default_enabled() -> bool {
    true
}

fn default_model() -> String {
    "llama-recipe".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_recipes_per_request() -> usize {
    3
}

fn default_temperatures() -> Vec<f32> {
    vec![0.5, 0.6, 0.7]
}

fn default_timeout() -> u64 {
    60
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE__PROVIDERS__OLLAMA__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let config = load_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the orchestrator cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.temperatures.is_empty() {
            return Err(ConfigError::Message(
                "generation.temperatures must contain at least one value".to_string(),
            ));
        }
        if let Some(t) = self
            .generation
            .temperatures
            .iter()
            .find(|t| !t.is_finite() || **t < 0.0)
        {
            return Err(ConfigError::Message(format!(
                "generation.temperatures contains invalid value {}",
                t
            )));
        }
        if self.generation.recipes_per_request == 0 {
            return Err(ConfigError::Message(
                "generation.recipes_per_request must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from file and environment variables
///
/// Environment variable format: RECIPE__PROVIDERS__OLLAMA__BASE_URL
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE__SERVER__PORT
        .add_source(
            Environment::with_prefix("RECIPE")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("generation.temperatures")
                .with_list_parse_key("generation.sampling.stop")
                .with_list_parse_key("fallback.order")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "ollama");
        assert_eq!(default_port(), 8000);
        assert_eq!(default_retry_attempts(), 3);
        assert_eq!(default_retry_delay_ms(), 1000);
        assert_eq!(default_temperatures(), vec![0.5, 0.6, 0.7]);
        assert_eq!(default_recipes_per_request(), 3);
    }

    #[test]
    fn test_fallback_config_default() {
        let fallback = FallbackConfig::default();
        assert!(!fallback.enabled);
        assert!(fallback.order.is_empty());
        assert_eq!(fallback.retry_attempts, 3);
        assert_eq!(fallback.retry_delay_ms, 1000);
    }

    #[test]
    fn test_default_config_has_ollama_provider() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "ollama");
        let ollama = config.providers.get("ollama").unwrap();
        assert!(ollama.enabled);
        assert_eq!(ollama.model, "llama-recipe");
        assert!(ollama.base_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_address() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(server.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            default_provider = "openai"
            timeout = 15

            [server]
            port = 9100

            [providers.openai]
            model = "recipe-llama"
            base_url = "http://localhost:8001"

            [generation]
            recipes_per_request = 2
            temperatures = [0.4, 0.5]

            [generation.sampling]
            top_k = 20
        "#;

        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.timeout, 15);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        let openai = config.providers.get("openai").unwrap();
        assert!(openai.enabled);
        assert_eq!(openai.base_url.as_deref(), Some("http://localhost:8001"));
        assert_eq!(config.generation.recipes_per_request, 2);
        assert_eq!(config.generation.temperatures, vec![0.4, 0.5]);
        assert_eq!(config.generation.sampling.top_k, 20);
        assert_eq!(config.generation.sampling.max_new_tokens, 180);
    }

    #[test]
    fn test_validate_rejects_empty_schedule() {
        let mut config = AppConfig::default();
        config.generation.temperatures.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_temperature() {
        let mut config = AppConfig::default();
        config.generation.temperatures = vec![0.5, -0.1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_recipes() {
        let mut config = AppConfig::default();
        config.generation.recipes_per_request = 0;
        assert!(config.validate().is_err());
    }
}
