#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use lunchvote::{
    api::{self, AppState},
    config,
    core::bootstrap,
    errors::Result,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database and schema
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema is in place."))
        .inspect_err(|e| error!("Failed to create database schema: {}", e))?;

    // 5. Seed built-in roles, their grants, and the admin account
    bootstrap::seed(&db, &app_config)
        .await
        .inspect(|()| info!("Baseline roles and admin account seeded."))
        .inspect_err(|e| error!("Failed to seed baseline data: {}", e))?;

    // 6. Serve the API
    let listener = TcpListener::bind(&app_config.bind_addr)
        .await
        .inspect(|_| info!("Listening on {}", app_config.bind_addr))
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.bind_addr, e))?;
    let router = api::build_router(AppState {
        db,
        config: app_config,
    });
    axum::serve(listener, router).await?;

    Ok(())
}
