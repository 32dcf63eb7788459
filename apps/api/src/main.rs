mod auth;
mod config;
mod cover_letter;
mod db;
mod errors;
mod extract;
mod llm_client;
mod models;
mod optimization;
mod render;
mod resumes;
mod routes;
mod schema;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtVerifier;
use crate::config::{AiProvider, Config};
use crate::db::create_pool;
use crate::llm_client::{GeminiClient, LlmProvider, OpenAiClient};
use crate::render::pdf::ChromiumEngine;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartResume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;

    // Initialize LLM provider
    let llm = build_llm(&config)?;
    info!("LLM provider initialized ({})", llm.name());

    let pdf = ChromiumEngine::new(config.chrome_bin.clone(), config.pdf_timeout);
    info!(
        "PDF engine: {} (timeout {:?}); AI failure mode: {:?}",
        config.chrome_bin, config.pdf_timeout, config.failure_policy
    );

    // Build app state
    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        llm,
        pdf: Arc::new(pdf),
        auth: Arc::new(JwtVerifier::new(&config.jwt_secret)),
        failure_policy: config.failure_policy,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the provider selected by AI_PROVIDER.
fn build_llm(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    let llm: Arc<dyn LlmProvider> = match config.ai_provider {
        AiProvider::OpenAi => {
            let client = OpenAiClient::new(
                config.openai_api_key.clone().unwrap_or_default(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
                config.ai_timeout,
            )?;
            info!("OpenAI model: {}", client.model());
            Arc::new(client)
        }
        AiProvider::Gemini => {
            let client = GeminiClient::new(
                config.google_api_key.clone().unwrap_or_default(),
                config.gemini_model.clone(),
                config.ai_timeout,
            )?;
            info!("Gemini model: {}", client.model());
            Arc::new(client)
        }
    };
    Ok(llm)
}
