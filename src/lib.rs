//! Recipe suggestion service built around a generative model.
//!
//! The model's free-form output is never trusted: every generation goes
//! through [`extractors::GeneratedTextExtractor`], which always produces a
//! complete [`RecipeResponse`] and falls back to fixed values for anything it
//! cannot validate.
//!
//! ```no_run
//! use recipe_llm_api::{providers::FakeProvider, RecipeGenerator, RecipeRequest};
//! use recipe_llm_api::config::GenerationSettings;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = RecipeGenerator::new(
//!     Box::new(FakeProvider::with_canned_recipe()),
//!     GenerationSettings::default(),
//! );
//! let request = RecipeRequest::new(["potato", "tomato", "onion"]).meal_type("dinner");
//! let list = generator.generate_recipes(&request, 3).await?;
//! assert_eq!(list.total_recipes, 3);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod generator;
pub mod model;
pub mod prompt;
pub mod providers;
pub mod server;

pub use crate::config::AppConfig;
pub use error::RecipeError;
pub use extractors::{extract, ExtractionRules, GeneratedTextExtractor};
pub use generator::{normalize_generation, RecipeGenerator};
pub use model::{aggregate, RecipeListResponse, RecipeRequest, RecipeResponse};
pub use prompt::build_prompt;
pub use providers::{LlmProvider, ProviderError, SamplingParams};

/// Generate recipes for a request using the configured provider chain.
pub async fn generate_recipes(
    config: &AppConfig,
    request: &RecipeRequest,
) -> Result<RecipeListResponse, RecipeError> {
    let generator = RecipeGenerator::from_config(config)?;
    Ok(generator.generate_default(request).await?)
}
