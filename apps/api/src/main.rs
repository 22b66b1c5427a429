mod ai;
mod auth;
mod config;
mod creations;
mod db;
mod envelope;
mod errors;
mod llm_client;
mod media;
mod models;
mod routes;
mod state;
mod vendor;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::clerk::ClerkClient;
use crate::config::Config;
use crate::creations::store::PgCreationStore;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::media::clipdrop::ClipdropClient;
use crate::media::cloudinary::CloudinaryClient;
use crate::media::pdf::PdfExtractReader;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; fails fast on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting creator API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let llm = LlmClient::new(config.gemini_api_key.clone(), config.gemini_base_url.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let identity = ClerkClient::new(
        config.clerk_secret_key.clone(),
        &config.clerk_jwt_key,
        config.clerk_api_url.clone(),
    )?;
    let images = ClipdropClient::new(
        config.clipdrop_api_key.clone(),
        config.clipdrop_base_url.clone(),
    )?;
    let image_host = CloudinaryClient::new(config.cloudinary.clone())?;
    info!(
        "Vendor clients initialized (cloudinary cloud: {})",
        config.cloudinary.cloud_name
    );

    let state = AppState {
        creations: Arc::new(PgCreationStore::new(db)),
        identity: Arc::new(identity),
        llm: Arc::new(llm),
        images: Arc::new(images),
        image_host: Arc::new(image_host),
        pdf: Arc::new(PdfExtractReader),
    };

    // The browser client is served from another origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
