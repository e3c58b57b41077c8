use thiserror::Error;

use crate::providers::ProviderError;

/// Errors that can occur while running the recipe service
#[derive(Error, Debug)]
pub enum RecipeError {
    /// The generation engine failed to produce text
    #[error("Generation failed: {0}")]
    Provider(#[from] ProviderError),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Socket or other I/O failure in the service layer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server could not be started
    #[error("Server error: {0}")]
    Server(String),
}
