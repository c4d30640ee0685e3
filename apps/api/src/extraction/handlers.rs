use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::{extract_candidate, extract_role};
use crate::models::candidate::CandidateRecord;
use crate::models::role::RoleRequirement;
use crate::state::AppState;
use crate::store;

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct RoleCreatedResponse {
    pub role_id: i64,
}

#[derive(Serialize)]
pub struct CandidateCreatedResponse {
    pub candidate_id: i64,
    pub external_id: String,
}

/// POST /api/v1/roles
pub async fn handle_create_role(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<RoleCreatedResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation(
            "Field 'text' must not be empty".to_string(),
        ));
    }

    let role = extract_role(&req.text, state.llm.as_ref(), state.registry.as_ref()).await;
    let role_id = store::insert_role(&state.db, &role).await?;
    Ok(Json(RoleCreatedResponse { role_id }))
}

/// GET /api/v1/roles/:id
pub async fn handle_get_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RoleRequirement>, AppError> {
    let role = store::get_role(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {id} not found")))?;
    Ok(Json(role))
}

/// POST /api/v1/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<CandidateCreatedResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation(
            "Field 'text' must not be empty".to_string(),
        ));
    }

    let record = extract_candidate(&req.text, state.llm.as_ref(), state.registry.as_ref()).await;
    let candidate_id = store::upsert_candidate(&state.db, &record).await?;
    Ok(Json(CandidateCreatedResponse {
        candidate_id,
        external_id: record.external_id,
    }))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CandidateRecord>, AppError> {
    let record = store::get_candidate(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(record))
}
