use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The picture directory exists and is a directory.
    pub media_healthy: bool,
}

/// GET /health -- database and picture storage status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = recipebook_db::health_check(&state.pool).await.is_ok();
    let media_healthy = tokio::fs::metadata(&state.config.media_root)
        .await
        .is_ok_and(|m| m.is_dir());

    if !media_healthy {
        tracing::warn!(media_root = %state.config.media_root.display(), "Media root unavailable");
    }

    Json(HealthResponse {
        status: if db_healthy && media_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_healthy,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
