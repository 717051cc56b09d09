use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health` liveness probe reporting the given application version.
pub fn health_router(version: &'static str) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            Json(HealthResponse {
                status: "ok",
                version,
            })
        }),
    )
}
