use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and which optional
/// collaborators are wired in. The pipeline runs pure when both are off.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screener-api",
        "collaborators": {
            "llm": state.llm.is_some(),
            "embeddings": state.llm.is_some(),
        }
    }))
}
