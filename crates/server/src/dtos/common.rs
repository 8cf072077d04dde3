use axum::Json;
use serde::Serialize;
use serde_json::{Value, json};

/// `{"success": true, "data": ...}`, the envelope every successful
/// response uses.
pub fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({"success": true, "data": data}))
}
