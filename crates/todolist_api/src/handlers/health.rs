//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

/// Static liveness payload.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `GET /health`: returns `{"status": "ok"}` without checking dependencies.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
