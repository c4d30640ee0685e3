//! Skill taxonomy registry — pluggable, trait-based sink for skills seen
//! during extraction.
//!
//! Extractors offer every skill they find; the registry keeps a growing
//! catalogue for later curation. Registration is strictly best-effort:
//! a failed upsert is logged and forgotten, never surfaced to the caller.
//!
//! `AppState` holds an `Arc<dyn SkillRegistry>`, wired once at startup.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::warn;

const DEFAULT_CATEGORY: &str = "Uncategorized";

/// The registry trait. Implement this to swap backends without touching
/// the extraction pipelines.
///
/// `upsert_skill` is idempotent: registering the same name twice returns
/// the same id and changes nothing.
#[async_trait]
pub trait SkillRegistry: Send + Sync {
    async fn upsert_skill(
        &self,
        name: &str,
        category: Option<&str>,
        aliases: &[String],
    ) -> anyhow::Result<i64>;
}

/// Offers a batch of skills to the registry, swallowing individual failures.
/// Extraction must succeed even when the registry is down.
pub async fn offer_skills(registry: &dyn SkillRegistry, skills: &[String]) {
    for skill in skills {
        if let Err(e) = registry.upsert_skill(skill, None, &[]).await {
            warn!("Skill registration failed for '{}': {}", skill, e);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SqliteSkillRegistry — default backend
// ────────────────────────────────────────────────────────────────────────────

/// Registry backed by the `skills` table in the service database.
#[derive(Debug, Clone)]
pub struct SqliteSkillRegistry {
    pool: SqlitePool,
}

impl SqliteSkillRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkillRegistry for SqliteSkillRegistry {
    async fn upsert_skill(
        &self,
        name: &str,
        category: Option<&str>,
        aliases: &[String],
    ) -> anyhow::Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("skill name is empty");
        }

        let category = category.unwrap_or(DEFAULT_CATEGORY);
        let aliases_json = serde_json::to_string(aliases)?;

        // INSERT OR IGNORE keeps the first spelling and category; a
        // follow-up SELECT resolves the id either way.
        sqlx::query("INSERT OR IGNORE INTO skills (name, category, aliases) VALUES (?, ?, ?)")
            .bind(name)
            .bind(category)
            .bind(&aliases_json)
            .execute(&self.pool)
            .await?;

        let id: i64 = sqlx::query_scalar("SELECT id FROM skills WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// NoopSkillRegistry — for tests and registry-less deployments
// ────────────────────────────────────────────────────────────────────────────

/// Registry that accepts everything and records nothing.
#[derive(Debug, Clone, Default)]
pub struct NoopSkillRegistry;

#[async_trait]
impl SkillRegistry for NoopSkillRegistry {
    async fn upsert_skill(
        &self,
        _name: &str,
        _category: Option<&str>,
        _aliases: &[String],
    ) -> anyhow::Result<i64> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_registry() -> SqliteSkillRegistry {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        SqliteSkillRegistry::new(pool)
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let registry = memory_registry().await;

        let first = registry.upsert_skill("Python", None, &[]).await.unwrap();
        let second = registry
            .upsert_skill("Python", Some("Language"), &[])
            .await
            .unwrap();
        assert_eq!(first, second);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills")
            .fetch_one(&registry.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_upsert_defaults_category_and_stores_aliases() {
        let registry = memory_registry().await;

        registry
            .upsert_skill("Kubernetes", None, &["k8s".to_string()])
            .await
            .unwrap();

        let (category, aliases): (String, String) =
            sqlx::query_as("SELECT category, aliases FROM skills WHERE name = 'Kubernetes'")
                .fetch_one(&registry.pool)
                .await
                .unwrap();
        assert_eq!(category, "Uncategorized");
        assert_eq!(aliases, r#"["k8s"]"#);
    }

    #[tokio::test]
    async fn test_empty_skill_name_is_rejected() {
        let registry = memory_registry().await;
        assert!(registry.upsert_skill("  ", None, &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_offer_skills_swallows_failures() {
        let registry = memory_registry().await;
        // The empty entry fails its upsert; the rest of the batch still lands.
        let skills = vec!["Python".to_string(), String::new(), "SQL".to_string()];
        offer_skills(&registry, &skills).await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills")
            .fetch_one(&registry.pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
