use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    ok: bool,
}

/// Liveness check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
