use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::rank::rank;
use crate::models::matching::{MatchResult, MatchRow};
use crate::state::AppState;
use crate::store;

/// Workflow states a stored match may move through. No notification is
/// sent on transition; this is bookkeeping for the recruiter.
const ALLOWED_STATUSES: [&str; 4] = [
    "pending",
    "interview_requested",
    "interview_scheduled",
    "rejected",
];

#[derive(Deserialize)]
pub struct MatchRunRequest {
    pub role_id: i64,
}

#[derive(Serialize)]
pub struct MatchRunResponse {
    pub role_id: i64,
    pub candidates_scored: usize,
    pub shortlist: Vec<MatchResult>,
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// POST /api/v1/match
pub async fn handle_run_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRunRequest>,
) -> Result<Json<MatchRunResponse>, AppError> {
    let role = store::get_role(&state.db, req.role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {} not found", req.role_id)))?;

    let candidates = store::list_candidates(&state.db).await?;
    let shortlist = rank(
        req.role_id,
        &role,
        &candidates,
        state.skill_scorer.as_ref(),
        &state.config.weights,
        state.config.shortlist_threshold,
    )
    .await;

    store::replace_matches(&state.db, req.role_id, &shortlist).await?;

    info!(
        "Match run for role {}: {} candidates scored, {} shortlisted",
        req.role_id,
        candidates.len(),
        shortlist.len()
    );

    Ok(Json(MatchRunResponse {
        role_id: req.role_id,
        candidates_scored: candidates.len(),
        shortlist,
    }))
}

/// GET /api/v1/roles/:id/matches
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<MatchRow>>, AppError> {
    store::get_role(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {id} not found")))?;

    let matches = store::list_matches(&state.db, id).await?;
    Ok(Json(matches))
}

/// PATCH /api/v1/matches/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<StatusCode, AppError> {
    if !ALLOWED_STATUSES.contains(&req.status.as_str()) {
        return Err(AppError::UnprocessableEntity(format!(
            "Status '{}' is not one of {:?}",
            req.status, ALLOWED_STATUSES
        )));
    }

    let updated = store::update_match_status(&state.db, id, &req.status).await?;
    if !updated {
        return Err(AppError::NotFound(format!("Match {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/roles/:id/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<store::DashboardReport>, AppError> {
    store::get_role(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {id} not found")))?;

    let report = store::dashboard(&state.db, id).await?;
    Ok(Json(report))
}
