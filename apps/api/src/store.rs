//! Persistence layer — every SQL statement for roles, candidates and
//! matches lives here. Handlers never touch sqlx directly.
//!
//! List-valued fields are stored as JSON text columns; encoding degrades
//! to `[]` rather than failing, mirroring the decode side.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::candidate::{CandidateRecord, CandidateRow};
use crate::models::matching::{MatchResult, MatchRow};
use crate::models::role::{RoleRequirement, RoleRow};

fn to_json(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Roles
// ────────────────────────────────────────────────────────────────────────────

pub async fn insert_role(pool: &SqlitePool, role: &RoleRequirement) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO roles (title, company, required_skills, preferred_skills,
                           required_experience, required_education, responsibilities)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&role.title)
    .bind(&role.company)
    .bind(to_json(&role.required_skills))
    .bind(to_json(&role.preferred_skills))
    .bind(role.required_experience_years as i64)
    .bind(&role.required_education_level)
    .bind(to_json(&role.responsibilities))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_role(pool: &SqlitePool, id: i64) -> Result<Option<RoleRequirement>, sqlx::Error> {
    let row: Option<RoleRow> = sqlx::query_as("SELECT * FROM roles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(RoleRow::into_record))
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates
// ────────────────────────────────────────────────────────────────────────────

/// Inserts a candidate, or replaces the stored fields when the external
/// identifier is already known. Re-uploading a CV refreshes the record
/// instead of duplicating the person.
pub async fn upsert_candidate(
    pool: &SqlitePool,
    record: &CandidateRecord,
) -> Result<i64, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO candidates (external_id, name, email, phone, summary, skills,
                                experience, education, certifications, languages)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(external_id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            phone = excluded.phone,
            summary = excluded.summary,
            skills = excluded.skills,
            experience = excluded.experience,
            education = excluded.education,
            certifications = excluded.certifications,
            languages = excluded.languages
        "#,
    )
    .bind(&record.external_id)
    .bind(&record.name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.summary)
    .bind(to_json(&record.skills))
    .bind(to_json(&record.experience))
    .bind(to_json(&record.education))
    .bind(to_json(&record.certifications))
    .bind(to_json(&record.languages))
    .execute(pool)
    .await?;

    // last_insert_rowid is unreliable on the conflict path, so resolve by key
    sqlx::query_scalar("SELECT id FROM candidates WHERE external_id = ?")
        .bind(&record.external_id)
        .fetch_one(pool)
        .await
}

pub async fn get_candidate(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<CandidateRecord>, sqlx::Error> {
    let row: Option<CandidateRow> = sqlx::query_as("SELECT * FROM candidates WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(CandidateRow::into_record))
}

/// All stored candidates with their ids, in insertion order. The match
/// pipeline scores a role against this full pool.
pub async fn list_candidates(
    pool: &SqlitePool,
) -> Result<Vec<(i64, CandidateRecord)>, sqlx::Error> {
    let rows: Vec<CandidateRow> = sqlx::query_as("SELECT * FROM candidates ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| (row.id, row.into_record()))
        .collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Matches
// ────────────────────────────────────────────────────────────────────────────

/// Persists a fresh shortlist for a role, superseding any prior run.
/// Prior rows are deleted, never updated, so stale justifications and
/// statuses cannot leak into the new ranking.
pub async fn replace_matches(
    pool: &SqlitePool,
    role_id: i64,
    results: &[MatchResult],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM matches WHERE role_id = ?")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    for result in results {
        sqlx::query(
            r#"
            INSERT INTO matches (role_id, candidate_id, composite_score, skills_score,
                                 experience_score, education_score, justification)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(result.role_id)
        .bind(result.candidate_id)
        .bind(result.composite_score)
        .bind(result.sub_scores.skills)
        .bind(result.sub_scores.experience)
        .bind(result.sub_scores.education)
        .bind(&result.justification)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

pub async fn list_matches(pool: &SqlitePool, role_id: i64) -> Result<Vec<MatchRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM matches WHERE role_id = ? ORDER BY composite_score DESC, id ASC",
    )
    .bind(role_id)
    .fetch_all(pool)
    .await
}

/// Updates one match's workflow status. Returns false when the id is unknown.
pub async fn update_match_status(
    pool: &SqlitePool,
    match_id: i64,
    status: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE matches SET status = ? WHERE id = ?")
        .bind(status)
        .bind(match_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard aggregation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct ScoreBucket {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Recruiter-facing aggregation for one role.
#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub role_id: i64,
    pub total_candidates: i64,
    pub matched_candidates: i64,
    /// Average composite over the role's stored matches, as a percentage.
    pub average_score_percent: f64,
    pub top_skills: Vec<SkillCount>,
    pub score_distribution: Vec<ScoreBucket>,
    pub status_breakdown: Vec<StatusCount>,
}

const BUCKET_LABELS: [&str; 5] = ["90-100%", "80-89%", "70-79%", "60-69%", "Below 60%"];
const TOP_SKILLS_LIMIT: usize = 5;

pub async fn dashboard(pool: &SqlitePool, role_id: i64) -> Result<DashboardReport, sqlx::Error> {
    let total_candidates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
        .fetch_one(pool)
        .await?;

    let matched_candidates: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM matches WHERE role_id = ?")
            .bind(role_id)
            .fetch_one(pool)
            .await?;

    let average: Option<f64> =
        sqlx::query_scalar("SELECT AVG(composite_score) FROM matches WHERE role_id = ?")
            .bind(role_id)
            .fetch_one(pool)
            .await?;

    let scores: Vec<f64> =
        sqlx::query_scalar("SELECT composite_score FROM matches WHERE role_id = ?")
            .bind(role_id)
            .fetch_all(pool)
            .await?;

    let mut bucket_counts = [0i64; BUCKET_LABELS.len()];
    for score in scores {
        let index = match score {
            s if s >= 0.9 => 0,
            s if s >= 0.8 => 1,
            s if s >= 0.7 => 2,
            s if s >= 0.6 => 3,
            _ => 4,
        };
        bucket_counts[index] += 1;
    }
    let score_distribution = BUCKET_LABELS
        .iter()
        .zip(bucket_counts)
        .map(|(label, count)| ScoreBucket {
            label: label.to_string(),
            count,
        })
        .collect();

    let status_breakdown = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM matches WHERE role_id = ? GROUP BY status ORDER BY status",
    )
    .bind(role_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(status, count)| StatusCount { status, count })
    .collect();

    let top_skills = top_skills_across_candidates(pool).await?;

    Ok(DashboardReport {
        role_id,
        total_candidates,
        matched_candidates,
        average_score_percent: average.unwrap_or(0.0) * 100.0,
        top_skills,
        score_distribution,
        status_breakdown,
    })
}

/// Counts skill occurrences across every stored candidate, case-insensitively,
/// keeping the first spelling seen. JSON decoding happens per row so one
/// corrupt column cannot sink the whole report.
async fn top_skills_across_candidates(pool: &SqlitePool) -> Result<Vec<SkillCount>, sqlx::Error> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT skills FROM candidates ORDER BY id")
        .fetch_all(pool)
        .await?;

    let mut counts: HashMap<String, (String, i64)> = HashMap::new();
    for column in columns {
        let skills: Vec<String> = serde_json::from_str(&column).unwrap_or_default();
        for skill in skills {
            let key = skill.to_lowercase();
            let entry = counts.entry(key).or_insert_with(|| (skill.clone(), 0));
            entry.1 += 1;
        }
    }

    let mut ranked: Vec<SkillCount> = counts
        .into_values()
        .map(|(skill, count)| SkillCount { skill, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    ranked.truncate(TOP_SKILLS_LIMIT);
    Ok(ranked)
}
