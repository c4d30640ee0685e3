use anyhow::{Context, Result};

use crate::matching::engine::MatchWeights;

/// Application configuration loaded from environment variables.
/// Every variable has a default; the service boots with an empty environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the Ollama server. `None` disables the text-completion
    /// and embedding collaborators entirely; the pipeline then runs pure.
    pub ollama_base_url: Option<String>,
    pub ollama_model: String,
    pub ollama_embed_model: String,
    /// Single bounded timeout applied to every collaborator HTTP call.
    pub llm_timeout_secs: u64,
    /// Scoring policy. Fixed constants by default, overridable at startup only.
    pub weights: MatchWeights,
    pub shortlist_threshold: f64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = MatchWeights::default();

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:screener.db?mode=rwc".to_string()),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            ollama_model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "mistral".to_string()),
            ollama_embed_model: std::env::var("OLLAMA_EMBED_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
            llm_timeout_secs: env_parse("LLM_TIMEOUT_SECS", 30)?,
            weights: MatchWeights {
                skills: env_parse("SKILLS_WEIGHT", defaults.skills)?,
                experience: env_parse("EXPERIENCE_WEIGHT", defaults.experience)?,
                education: env_parse("EDUCATION_WEIGHT", defaults.education)?,
                required_skills: env_parse("REQUIRED_SKILLS_WEIGHT", defaults.required_skills)?,
                preferred_skills: env_parse("PREFERRED_SKILLS_WEIGHT", defaults.preferred_skills)?,
            },
            shortlist_threshold: env_parse("SHORTLIST_THRESHOLD", 0.5)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an environment variable and parses it, falling back to `default`
/// when the variable is unset. A set-but-unparseable value is a startup error.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
