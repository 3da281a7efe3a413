use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Flood Relief System API is running",
    }))
}
