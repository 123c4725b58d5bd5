//! Health check endpoint for service monitoring.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Health check handler.
///
/// Not behind the proxy gate and never calls the admin API.
///
/// # Response (200 OK)
///
/// ```json
/// { "ok": true }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
