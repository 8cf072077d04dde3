use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

/// Simple liveness endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "Health"
)]
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "timestamp": Utc::now().to_rfc3339()}))
}
