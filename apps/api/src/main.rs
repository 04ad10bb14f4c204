mod config;
mod corpus;
mod errors;
mod generation;
mod image;
mod llm_client;
mod publish;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::corpus::Corpus;
use crate::image::ImageClient;
use crate::llm_client::LlmClient;
use crate::publish::XClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    let default_filter = format!(
        "{}={}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        &config.rust_log
    );
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Haiku API v{}", env!("CARGO_PKG_VERSION"));

    // Load the haiku corpus (read-only for the process lifetime)
    let corpus = Arc::new(Corpus::load(&config.corpus_path)?);

    // Initialize OpenAI clients
    let llm = LlmClient::new(config.openai_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let images = ImageClient::new(config.openai_api_key.clone());
    info!("Image client initialized (model: {})", image::IMAGE_MODEL);

    // Publishing is optional; absent token disables the endpoint
    let publisher = config
        .x_access_token
        .clone()
        .map(|token| Arc::new(XClient::new(token)));
    if publisher.is_none() {
        info!("X_ACCESS_TOKEN not set — publishing disabled");
    }

    // Build app state
    let state = AppState {
        corpus,
        llm,
        images,
        publisher,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
