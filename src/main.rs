mod admin;
mod analytics;
mod announcement;
mod assignment;
mod attendance;
mod auth;
mod chat;
mod db;
mod document;
mod enrollment;
mod error;
mod message;
mod middleware;
mod program;
mod rates;
mod routes;
mod state;
mod user;

use anyhow::Context;
use db::{create_pool, run_migrations};
use routes::create_router;
use state::{AppState, AuthMode, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,edubridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.auth_mode == AuthMode::Bypass {
        tracing::warn!("AUTH_MODE=bypass: every login is granted administrator access");
    }
    if config.openrouter_api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY not set; the assistant will answer with a notice");
    }

    tracing::info!("Connecting to database...");
    let db = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to the database")?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await.context("failed to run migrations")?;

    let addr = config.bind_address();
    let state = AppState::new(db, Arc::new(config));
    let app = create_router(state);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
