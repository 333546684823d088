mod auth;
mod cms;
mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::identity::FirebaseIdentity;
use crate::auth::session::SessionSigner;
use crate::cms::CmsClient;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pitch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize CMS client
    let cms = CmsClient::new(
        &config.sanity_project_id,
        config.sanity_dataset.clone(),
        config.sanity_api_token.clone(),
    )?;
    info!(
        "CMS client initialized (project: {}, dataset: {})",
        config.sanity_project_id, config.sanity_dataset
    );
    info!("Project catalog source: {:?}", config.catalog_source);

    // Initialize identity verification and session signing
    let identity = Arc::new(FirebaseIdentity::new(config.firebase_api_key.clone())?);
    let sessions = SessionSigner::new(
        &config.session_secret,
        config.session_cookie_name.clone(),
        !config.is_development(),
    )?;
    if config.preview_secret.is_none() {
        info!("PREVIEW_SECRET not set; preview endpoint will reject all requests");
    }

    // Build app state
    let state = AppState {
        llm,
        cms,
        identity,
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the public frontend once its host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
