use axum::Json;
use serde_json::json;
use serde_json::Value;

/// Liveness probe. Public on purpose; never touches the auth core.
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
