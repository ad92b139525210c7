#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::router;
use crate::config::Config;
use crate::database::Database;
use crate::database::DatabaseConfig;
use crate::summarizer::OllamaProcess;
use crate::summarizer::OllamaSummarizer;
use crate::summarizer::Summarizer;
use crate::utils::env_var;

mod api;
mod config;
mod database;
mod git_tracker;
mod graceful_shutdown;
mod notes;
mod root;
mod summarizer;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "journal=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;

    let ollama = OllamaProcess::start(&config.ollama).await;
    if ollama.is_managed() {
        tracing::info!("Ollama will be stopped on shutdown");
    }

    let address = config.address;
    let database_config = DatabaseConfig::Url(config.database_url.clone());
    let app = setup_app(config, database_config).await?;

    let listener = TcpListener::bind(address).await?;
    tracing::info!("Listening on {}", address);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await;

    ollama.stop().await;

    Ok(served?)
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if any of its dependencies fail to load:
/// - Database connection and migrations
/// - Summarizer HTTP client
pub async fn setup_app(config: Config, database_config: DatabaseConfig) -> Result<Router> {
    let database = Database::from_config(database_config).await?;

    let summarizer: Arc<dyn Summarizer> = Arc::new(OllamaSummarizer::new(&config.ollama)?);

    Ok(create_router(database, summarizer, config))
}

/// Create the router for the Journal
fn create_router(database: Database, summarizer: Arc<dyn Summarizer>, config: Config) -> Router {
    Router::new()
        .route("/", get(root::root))
        .nest("/api", router())
        .fallback(root::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(Extension(database))
        .layer(Extension(summarizer))
        .layer(Extension(Arc::new(config)))
}

/// Cross-origin requests are allowed from anywhere, the desktop frontend runs on its own origin
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            env_var("RUST_LOG").unwrap_or_else(|| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}
