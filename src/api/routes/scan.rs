use axum::{extract::State, Json};

use crate::api::models::{CardScanRequest, EndpointScanRequest};
use crate::api::AppState;
use crate::errors::VigilError;
use crate::models::ScanResult;

pub async fn scan_card(
    State(state): State<AppState>,
    Json(req): Json<CardScanRequest>,
) -> Result<Json<ScanResult>, VigilError> {
    let result = state
        .engine
        .scan_card(req.url.as_deref(), req.json_content.as_deref())
        .await?;
    Ok(Json(result))
}

pub async fn scan_endpoint(
    State(state): State<AppState>,
    Json(req): Json<EndpointScanRequest>,
) -> Result<Json<ScanResult>, VigilError> {
    let result = state.engine.scan_endpoint(req.url.as_deref()).await?;
    Ok(Json(result))
}
