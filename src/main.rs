use log::error;
use recipe_llm_api::{server, AppConfig, RecipeError};

#[tokio::main]
async fn main() -> Result<(), RecipeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    server::serve(&config).await
}
