use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-dimension scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

/// One scored (role, candidate) pairing. Created fresh at match time and
/// never mutated afterward; re-running a match supersedes prior results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub role_id: i64,
    pub candidate_id: i64,
    pub composite_score: f64,
    pub sub_scores: SubScores,
    pub justification: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MatchRow {
    pub id: i64,
    pub role_id: i64,
    pub candidate_id: i64,
    pub composite_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub justification: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}
