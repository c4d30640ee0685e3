pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction API (Phase 1)
        .route("/api/v1/roles", post(extraction::handle_create_role))
        .route("/api/v1/roles/:id", get(extraction::handle_get_role))
        .route("/api/v1/candidates", post(extraction::handle_create_candidate))
        .route(
            "/api/v1/candidates/:id",
            get(extraction::handle_get_candidate),
        )
        // Matching API (Phase 2)
        .route("/api/v1/match", post(matching::handle_run_match))
        .route("/api/v1/roles/:id/matches", get(matching::handle_list_matches))
        .route(
            "/api/v1/matches/:id/status",
            patch(matching::handle_update_status),
        )
        .route(
            "/api/v1/roles/:id/dashboard",
            get(matching::handle_dashboard),
        )
        .with_state(state)
}
