//! Health probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

/// `GET /health`: liveness plus a database ping. Reports 503 when the
/// store does not answer.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut body = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });
    let mut status = StatusCode::OK;

    match state.postgres.as_deref() {
        Some(postgres) => match postgres.ping().await {
            Ok(()) => {
                body["checks"]["database"] = json!({ "status": "healthy" });
            }
            Err(e) => {
                warn!("Health check database ping failed: {}", e);
                body["status"] = json!("unhealthy");
                body["checks"]["database"] = json!({ "status": "unhealthy" });
                status = StatusCode::SERVICE_UNAVAILABLE;
            }
        },
        None => {
            body["checks"]["database"] = json!({ "status": "not_configured" });
        }
    }

    (status, Json(body))
}
