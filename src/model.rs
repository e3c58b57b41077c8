use serde::{Deserialize, Serialize};

/// Caller constraints for one recipe suggestion request.
///
/// `ingredients` keeps the caller's order so the rendered prompt is stable.
/// An empty list is accepted but produces a degenerate prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub ingredients: Vec<String>,
    #[serde(default = "default_cuisine")]
    pub cuisine: String,
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    #[serde(default = "default_diet")]
    pub diet: Option<String>,
}

impl RecipeRequest {
    /// Build a request with the default cuisine, meal type and diet.
    pub fn new<I, S>(ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            cuisine: default_cuisine(),
            meal_type: default_meal_type(),
            diet: default_diet(),
        }
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = cuisine.into();
        self
    }

    pub fn meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.meal_type = meal_type.into();
        self
    }

    pub fn diet(mut self, diet: Option<String>) -> Self {
        self.diet = diet;
        self
    }
}

fn default_cuisine() -> String {
    "Indian".to_string()
}

fn default_meal_type() -> String {
    "lunch".to_string()
}

fn default_diet() -> Option<String> {
    Some("veg".to_string())
}

/// A fully populated recipe. Every field holds either extracted data or a fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub recipe_name: String,
    pub steps: Vec<String>,
    pub calories: String,
}

/// The list returned to callers; `total_recipes` always equals `recipes.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeResponse>,
    pub total_recipes: usize,
}

impl From<Vec<RecipeResponse>> for RecipeListResponse {
    fn from(recipes: Vec<RecipeResponse>) -> Self {
        aggregate(recipes)
    }
}

/// Wrap extracted recipes into a list response, preserving order.
pub fn aggregate(recipes: Vec<RecipeResponse>) -> RecipeListResponse {
    let total_recipes = recipes.len();
    RecipeListResponse {
        recipes,
        total_recipes,
    }
}
