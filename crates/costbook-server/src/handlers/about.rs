//! Service metadata handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;
use costbook_core::TeamMember;

/// GET /health - Liveness check
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// GET /api/about - Team members behind this deployment
pub async fn about(State(state): State<Arc<AppState>>) -> Json<Vec<TeamMember>> {
    Json(state.config.team.clone())
}
