use crate::model::RecipeResponse;
use std::sync::OnceLock;

mod generated_text;
mod rules;

pub use self::generated_text::{ExtractionReport, FieldSource, GeneratedTextExtractor};
pub use self::rules::{
    ExtractionRules, COOKING_VERBS, FALLBACK_CALORIES, FALLBACK_RECIPE_NAME, FALLBACK_STEPS,
    HALLUCINATION_KEYWORDS, NAME_DELIMITERS, WEIRD_STEP_CHARS,
};

/// Rules used when no custom set is supplied.
pub fn default_rules() -> &'static ExtractionRules {
    static RULES: OnceLock<ExtractionRules> = OnceLock::new();
    RULES.get_or_init(ExtractionRules::default)
}

/// Extract a recipe from raw generated text using the default rules.
pub fn extract(raw: &str) -> RecipeResponse {
    GeneratedTextExtractor::new(default_rules()).extract(raw)
}
