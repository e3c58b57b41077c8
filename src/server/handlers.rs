use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use serde_json::json;

use super::AppState;
use crate::model::{RecipeListResponse, RecipeRequest};
use crate::providers::ProviderError;

pub const SERVICE_NAME: &str = "Indian Recipe LLM API";
pub const SERVICE_VERSION: &str = "1.0";

pub const GENERATE_RECIPE_PATH: &str = "/generate-recipe";
pub const HEALTH_CHECK_PATH: &str = "/health-check";
pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub generate_recipe: String,
    pub health_check: String,
}

/// Upstream generation failure, rendered as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub ProviderError);

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Recipe generation failed: {}", self.0);

        match self.0 {
            ProviderError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Rate limit reached" })),
            )
                .into_response(),
            other => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "Failed to generate recipes",
                    "details": other.to_string(),
                })),
            )
                .into_response(),
        }
    }
}

pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(request): Json<RecipeRequest>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let recipes = state.generator.generate_default(&request).await?;
    Ok(Json(recipes))
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        endpoints: Endpoints {
            generate_recipe: format!("POST {}", GENERATE_RECIPE_PATH),
            health_check: format!("GET {}", HEALTH_CHECK_PATH),
        },
    })
}
