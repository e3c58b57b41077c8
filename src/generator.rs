use crate::config::{AppConfig, GenerationSettings};
use crate::extractors::{ExtractionRules, GeneratedTextExtractor};
use crate::model::{aggregate, RecipeListResponse, RecipeRequest};
use crate::prompt::{build_prompt, RECIPE_NAME_MARKER, RESPONSE_MARKER};
use crate::providers::{FallbackProvider, LlmProvider, ProviderError};
use log::{debug, info};

/// Upper bound on generations per request, whatever the caller asks for.
pub const MAX_CANDIDATES: usize = 3;

/// Runs one generation per scheduled temperature and extracts a recipe from each.
pub struct RecipeGenerator {
    provider: Box<dyn LlmProvider>,
    settings: GenerationSettings,
    rules: ExtractionRules,
}

impl RecipeGenerator {
    pub fn new(provider: Box<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self {
            provider,
            settings,
            rules: ExtractionRules::default(),
        }
    }

    /// Build the generator with the provider chain described by the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let provider = FallbackProvider::new(config)?;
        Ok(Self::new(Box::new(provider), config.generation.clone()))
    }

    pub fn with_rules(mut self, rules: ExtractionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Temperatures used for a request asking for `count` recipes.
    pub fn temperatures_for(&self, count: usize) -> &[f32] {
        let k = count
            .min(MAX_CANDIDATES)
            .min(self.settings.temperatures.len());
        &self.settings.temperatures[..k]
    }

    /// Generate normalized raw texts, one per scheduled temperature.
    ///
    /// Calls run one after another; the first upstream failure aborts the request.
    pub async fn generate_raw(
        &self,
        request: &RecipeRequest,
        count: usize,
    ) -> Result<Vec<String>, ProviderError> {
        let prompt = build_prompt(request);
        let mut texts = Vec::new();

        for &temperature in self.temperatures_for(count) {
            let raw = self
                .provider
                .generate(&prompt, temperature, &self.settings.sampling)
                .await?;
            debug!("Raw generation at temperature {}: {:?}", temperature, raw);
            texts.push(normalize_generation(&raw));
        }

        Ok(texts)
    }

    /// Generate up to `count` validated recipes for a request.
    pub async fn generate_recipes(
        &self,
        request: &RecipeRequest,
        count: usize,
    ) -> Result<RecipeListResponse, ProviderError> {
        info!(
            "Generating {} recipe(s) with {} for ingredients: {}",
            self.temperatures_for(count).len(),
            self.provider.provider_name(),
            request.ingredients.join(", ")
        );

        let extractor = GeneratedTextExtractor::new(&self.rules);
        let recipes = self
            .generate_raw(request, count)
            .await?
            .iter()
            .map(|text| {
                let (recipe, report) = extractor.extract_with_report(text);
                debug!("Extraction report for {:?}: {:?}", recipe.recipe_name, report);
                recipe
            })
            .collect();

        Ok(aggregate(recipes))
    }

    /// Generate the configured number of recipes per request.
    pub async fn generate_default(
        &self,
        request: &RecipeRequest,
    ) -> Result<RecipeListResponse, ProviderError> {
        self.generate_recipes(request, self.settings.recipes_per_request)
            .await
    }
}

/// Isolate the model's answer and make sure it starts at the recipe name marker.
///
/// Backends differ in whether they echo the prompt; both shapes normalize to
/// text beginning with `Recipe Name:`.
pub fn normalize_generation(raw: &str) -> String {
    let response = match raw.rfind(RESPONSE_MARKER) {
        Some(pos) => &raw[pos + RESPONSE_MARKER.len()..],
        None => raw,
    };
    let response = response.trim();

    if response.starts_with(RECIPE_NAME_MARKER) {
        response.to_string()
    } else {
        format!("{} {}", RECIPE_NAME_MARKER, response)
    }
}
