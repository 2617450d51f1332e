//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `true` while the process is serving.
    pub ok: bool,
}

/// `GET /health` - liveness probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health_check().await;
        assert!(response.0.ok);
    }
}
