//! Health endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_connections: usize,
    pub connected_users: usize,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.connections.registry();
    Json(HealthResponse {
        status: "ok",
        active_connections: registry.connection_count(),
        connected_users: registry.user_count(),
    })
}
