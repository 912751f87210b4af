use axum_helpers::server::{create_production_app, create_router};
use axum_helpers::set_expose_error_details;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_events::ImageStore;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);
    set_expose_error_details(config.environment.exposes_error_details());

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    // Connect to MongoDB with retry
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    // Get the database
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    // Initialize indexes
    api::events::init_indexes(&db).await?;

    let images = ImageStore::new(&config.upload_dir);
    images.ensure_dir().await?;
    info!("Serving uploads from {}", images.dir().display());

    // Initialize the application state
    let state = AppState {
        config,
        mongo_client,
        db,
        images,
    };

    // Build router with API routes, docs and cross-cutting layers
    let app = create_router::<openapi::ApiDoc>(api::routes(&state))?;

    info!("Starting Events API with production-ready shutdown (30s timeout)");

    let mongo_client = state.mongo_client.clone();

    // Production-ready server with graceful shutdown
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            database::mongodb::disconnect(mongo_client).await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Events API shutdown complete");
    Ok(())
}
