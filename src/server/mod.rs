//! HTTP surface of the service.
//!
//! Thin wrappers around [`RecipeGenerator`]; the only validation done here is
//! the JSON shape check performed by the `Json` extractor.

mod handlers;

pub use handlers::{
    ApiError, Endpoints, HealthResponse, ServiceInfo, GENERATE_RECIPE_PATH, HEALTH_CHECK_PATH,
    ROOT_PATH, SERVICE_NAME, SERVICE_VERSION,
};

use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::generator::RecipeGenerator;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<RecipeGenerator>,
}

impl AppState {
    pub fn new(generator: RecipeGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(ROOT_PATH, get(handlers::root))
        .route(HEALTH_CHECK_PATH, get(handlers::health_check))
        .route(GENERATE_RECIPE_PATH, post(handlers::generate_recipe))
        .with_state(state)
}

/// Bind the configured address and serve until ctrl-c.
pub async fn serve(config: &AppConfig) -> Result<(), RecipeError> {
    let generator = RecipeGenerator::from_config(config)?;
    info!(
        "Using provider '{}' with temperatures {:?}",
        generator.provider_name(),
        generator.settings().temperatures
    );

    let app = router(AppState::new(generator));

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RecipeError::Server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
