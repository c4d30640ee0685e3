//! Match scoring engine.
//!
//! A pure lexical scorer produces every score; an optional embedding-backed
//! decorator can only lift the skills score and degrades to the lexical
//! result whenever the collaborator is unavailable or errors. The engine is
//! carried in `AppState` as an `Arc<dyn SkillScorer>`, swapped at startup.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::warn;

use crate::llm_client::OllamaClient;
use crate::matching::education::{candidate_ordinal, education_score, required_ordinal};
use crate::matching::experience::{experience_score, extract_years};
use crate::matching::skills::{assess, SkillAssessment};
use crate::models::candidate::CandidateRecord;
use crate::models::matching::SubScores;
use crate::models::role::RoleRequirement;

/// Cosine similarity at or above this counts a lexically-missed skill as
/// covered when the embedding collaborator is in play.
const SEMANTIC_MATCH_THRESHOLD: f32 = 0.75;

/// Relative weights for the composite and the skills split. Policy values,
/// overridable through configuration, never derived at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub required_skills: f64,
    pub preferred_skills: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 0.5,
            experience: 0.3,
            education: 0.2,
            required_skills: 0.7,
            preferred_skills: 0.3,
        }
    }
}

/// Skill-dimension outcome for one (role, candidate) pair. The assessments
/// carry the matched/missing enumeration the justification text is built
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillScore {
    pub required: SkillAssessment,
    pub preferred: SkillAssessment,
    pub combined: f64,
}

/// The skill-scoring seam. Implementations swap without touching callers.
#[async_trait]
pub trait SkillScorer: Send + Sync {
    async fn score(&self, role: &RoleRequirement, candidate: &CandidateRecord) -> SkillScore;
}

// ────────────────────────────────────────────────────────────────────────────
// LexicalSkillScorer — pure, deterministic default
// ────────────────────────────────────────────────────────────────────────────

/// Pure lexical scorer. Fast, deterministic, no collaborator calls.
#[derive(Debug, Clone)]
pub struct LexicalSkillScorer {
    weights: MatchWeights,
}

impl LexicalSkillScorer {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }
}

#[async_trait]
impl SkillScorer for LexicalSkillScorer {
    async fn score(&self, role: &RoleRequirement, candidate: &CandidateRecord) -> SkillScore {
        let required = assess(&role.required_skills, &candidate.skills);
        let preferred = assess(&role.preferred_skills, &candidate.skills);
        let combined = required.score * self.weights.required_skills
            + preferred.score * self.weights.preferred_skills;
        SkillScore {
            required,
            preferred,
            combined,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// EmbeddingSkillScorer — decorator over the lexical scorer
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the lexical scorer with embedding similarity. A skill the lexical
/// pass missed still counts toward the score when its best cosine against
/// the candidate's skills clears the threshold. Enumeration stays lexical.
pub struct EmbeddingSkillScorer {
    inner: LexicalSkillScorer,
    llm: OllamaClient,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl EmbeddingSkillScorer {
    pub fn new(llm: OllamaClient, weights: MatchWeights) -> Self {
        Self {
            inner: LexicalSkillScorer::new(weights),
            llm,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Score for one assessment after the semantic rescue pass.
    async fn lifted(
        &self,
        assessment: &SkillAssessment,
        offered: &[String],
        wanted_count: usize,
    ) -> f64 {
        if assessment.missing.is_empty() || offered.is_empty() {
            return assessment.score;
        }
        let mut rescued = 0usize;
        for skill in &assessment.missing {
            if self.semantically_matches(skill, offered).await {
                rescued += 1;
            }
        }
        (assessment.matched.len() + rescued) as f64 / wanted_count.max(1) as f64
    }

    async fn semantically_matches(&self, wanted: &str, offered: &[String]) -> bool {
        let Some(wanted_vector) = self.embedding(wanted).await else {
            return false;
        };
        for have in offered {
            if let Some(have_vector) = self.embedding(have).await {
                if cosine_similarity(&wanted_vector, &have_vector) >= SEMANTIC_MATCH_THRESHOLD {
                    return true;
                }
            }
        }
        false
    }

    /// Cached embedding lookup. Any failure yields `None`, which callers
    /// treat as "no semantic match", leaving the lexical result standing.
    async fn embedding(&self, skill: &str) -> Option<Vec<f32>> {
        let key = skill.trim().to_lowercase();
        let cached = self.cache.lock().ok()?.get(&key).cloned();
        if let Some(vector) = cached {
            return Some(vector);
        }
        match self.llm.embed(&key).await {
            Ok(vector) => {
                self.cache.lock().ok()?.insert(key, vector.clone());
                Some(vector)
            }
            Err(e) => {
                warn!("Embedding lookup failed for '{key}': {e}");
                None
            }
        }
    }
}

#[async_trait]
impl SkillScorer for EmbeddingSkillScorer {
    async fn score(&self, role: &RoleRequirement, candidate: &CandidateRecord) -> SkillScore {
        let lexical = self.inner.score(role, candidate).await;

        let required_score = self
            .lifted(&lexical.required, &candidate.skills, role.required_skills.len())
            .await;
        let preferred_score = self
            .lifted(&lexical.preferred, &candidate.skills, role.preferred_skills.len())
            .await;

        let weights = self.inner.weights;
        SkillScore {
            combined: required_score * weights.required_skills
                + preferred_score * weights.preferred_skills,
            required: SkillAssessment {
                score: required_score,
                ..lexical.required
            },
            preferred: SkillAssessment {
                score: preferred_score,
                ..lexical.preferred
            },
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

// ────────────────────────────────────────────────────────────────────────────
// Pair scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores one (role, candidate) pair into the three sub-scores plus the
/// skill detail the justification text is built from.
pub async fn score_pair(
    role: &RoleRequirement,
    candidate: &CandidateRecord,
    scorer: &dyn SkillScorer,
) -> (SubScores, SkillScore) {
    let skill_score = scorer.score(role, candidate).await;
    let years = extract_years(&candidate.experience);
    let sub = SubScores {
        skills: skill_score.combined,
        experience: experience_score(years, role.required_experience_years),
        education: education_score(
            candidate_ordinal(&candidate.education),
            required_ordinal(&role.required_education_level),
        ),
    };
    (sub, skill_score)
}

/// Weighted composite of the three sub-scores.
pub fn composite_score(sub: &SubScores, weights: &MatchWeights) -> f64 {
    sub.skills * weights.skills
        + sub.experience * weights.experience
        + sub.education * weights.education
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_vec(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn role(required: &[&str], preferred: &[&str], years: u32, education: &str) -> RoleRequirement {
        RoleRequirement {
            title: "Data Engineer".to_string(),
            company: "Initech".to_string(),
            required_skills: to_vec(required),
            preferred_skills: to_vec(preferred),
            required_experience_years: years,
            required_education_level: education.to_string(),
            responsibilities: Vec::new(),
        }
    }

    fn candidate(skills: &[&str], experience: &[&str], education: &[&str]) -> CandidateRecord {
        CandidateRecord {
            external_id: "C1".to_string(),
            name: "Test Person".to_string(),
            email: String::new(),
            phone: String::new(),
            summary: String::new(),
            skills: to_vec(skills),
            experience: to_vec(experience),
            education: to_vec(education),
            certifications: Vec::new(),
            languages: Vec::new(),
        }
    }

    #[test]
    fn test_default_weights() {
        let weights = MatchWeights::default();
        assert_eq!(weights.skills, 0.5);
        assert_eq!(weights.experience, 0.3);
        assert_eq!(weights.education, 0.2);
        assert_eq!(weights.required_skills, 0.7);
        assert_eq!(weights.preferred_skills, 0.3);
    }

    #[tokio::test]
    async fn test_lexical_scorer_weighted_split() {
        let scorer = LexicalSkillScorer::new(MatchWeights::default());
        let score = scorer
            .score(
                &role(&["Python", "SQL"], &["Docker"], 0, ""),
                &candidate(&["python", "Java"], &[], &[]),
            )
            .await;
        assert_eq!(score.required.matched, vec!["Python"]);
        assert_eq!(score.required.missing, vec!["SQL"]);
        assert!(score.preferred.matched.is_empty());
        assert!((score.required.score - 0.5).abs() < 1e-9);
        assert!((score.combined - 0.35).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_full_pair_scoring_scenario() {
        let scorer = LexicalSkillScorer::new(MatchWeights::default());
        let role = role(&["Python", "SQL"], &["Docker"], 5, "Bachelor's degree");
        let candidate = candidate(
            &["python", "Java"],
            &["Engineer at Acme (2018-2023)"],
            &["Diploma in IT, 2015"],
        );

        let (sub, _) = score_pair(&role, &candidate, &scorer).await;
        assert!((sub.skills - 0.35).abs() < 1e-9);
        assert!((sub.experience - 1.0).abs() < 1e-9);
        assert!((sub.education - 0.5).abs() < 1e-9);

        let composite = composite_score(&sub, &MatchWeights::default());
        assert!((composite - 0.575).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_scores_stay_in_unit_interval() {
        let scorer = LexicalSkillScorer::new(MatchWeights::default());
        let cases = [
            (role(&[], &[], 0, ""), candidate(&[], &[], &[])),
            (
                role(&["Rust"], &["Go"], 30, "PhD"),
                candidate(
                    &["Rust", "Go"],
                    &["Staff Engineer at Initech (1990-2040)", "99 years of systems work"],
                    &["Doctorate in CS (1999-2004)"],
                ),
            ),
        ];
        for (role, candidate) in &cases {
            let (sub, _) = score_pair(role, candidate, &scorer).await;
            let composite = composite_score(&sub, &MatchWeights::default());
            for value in [sub.skills, sub.experience, sub.education, composite] {
                assert!((0.0..=1.0).contains(&value), "out of range: {value}");
            }
        }
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
