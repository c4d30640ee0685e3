use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::llm_client::OllamaClient;
use crate::matching::engine::SkillScorer;
use crate::taxonomy::SkillRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// None when no Ollama base URL is configured; extraction then never
    /// leaves the regex cascades.
    pub llm: Option<OllamaClient>,
    /// Pluggable skill scorer. Default: LexicalSkillScorer. Swapped at
    /// startup for the embedding decorator when Ollama is configured.
    pub skill_scorer: Arc<dyn SkillScorer>,
    /// Sink for every skill the extractors encounter.
    pub registry: Arc<dyn SkillRegistry>,
    pub config: Config,
}
