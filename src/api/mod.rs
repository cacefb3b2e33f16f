pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::EngineConfig;
use crate::db::Database;
use crate::engine::ScanEngine;
use crate::errors::VigilError;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub engine: Arc<ScanEngine>,
}

pub fn create_app_state(db_path: &str, config: EngineConfig) -> Result<AppState, VigilError> {
    let db = Database::new(db_path)?;
    let engine = Arc::new(ScanEngine::new(config, db.clone())?);
    Ok(AppState { db, engine })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/scan/card", axum::routing::post(routes::scan::scan_card))
        .route(
            "/api/scan/endpoint",
            axum::routing::post(routes::scan::scan_endpoint),
        )
        .route("/api/history", axum::routing::get(routes::history::list_history))
        // The dashboard is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
