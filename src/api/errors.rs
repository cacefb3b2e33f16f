use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::errors::VigilError;

impl IntoResponse for VigilError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            VigilError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            VigilError::Config(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(json!({"error": message}))).into_response()
    }
}
