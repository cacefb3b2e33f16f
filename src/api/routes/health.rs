use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "vigil",
        "version": env!("CARGO_PKG_VERSION"),
        "built": env!("BUILD_TIMESTAMP"),
    }))
}
