mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod models;
mod normalize;
mod routes;
mod state;
mod store;
mod taxonomy;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::OllamaClient;
use crate::matching::{EmbeddingSkillScorer, LexicalSkillScorer, SkillScorer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::taxonomy::{SkillRegistry, SqliteSkillRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (every variable has a default)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite and the tables this service owns
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize the optional Ollama collaborator
    let llm = config.ollama_base_url.as_deref().map(|base_url| {
        OllamaClient::new(
            base_url,
            &config.ollama_model,
            &config.ollama_embed_model,
            config.llm_timeout_secs,
        )
    });
    match &llm {
        Some(_) => info!(
            "Ollama client initialized (model: {}, embeddings: {})",
            config.ollama_model, config.ollama_embed_model
        ),
        None => info!("OLLAMA_BASE_URL unset — extraction and scoring run pure"),
    }

    // Initialize the skill scorer (lexical by default, embedding-decorated when Ollama is up)
    let skill_scorer: Arc<dyn SkillScorer> = match &llm {
        Some(client) => Arc::new(EmbeddingSkillScorer::new(client.clone(), config.weights)),
        None => Arc::new(LexicalSkillScorer::new(config.weights)),
    };

    // Initialize the skill registry
    let registry: Arc<dyn SkillRegistry> = Arc::new(SqliteSkillRegistry::new(db.clone()));

    // Build app state
    let state = AppState {
        db,
        llm,
        skill_scorer,
        registry,
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
