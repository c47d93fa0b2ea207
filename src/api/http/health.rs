// src/api/http/health.rs
//
// Informational root endpoint and a health probe for load balancers.

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to Doc AI Editor!";

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    provider: &'static str,
    sessions: usize,
    connected_users: usize,
}

/// Always 200 while the process is serving; reports in-memory session counts.
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        provider: state.completion.name(),
        sessions: state.store.session_count().await,
        connected_users: state.connections.active_users().await,
    })
}
