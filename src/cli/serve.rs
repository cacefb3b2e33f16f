use tracing::info;

use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::{self, EngineConfig};
use crate::errors::VigilError;

pub async fn handle_serve(args: ServeArgs) -> Result<(), VigilError> {
    info!(host = %args.host, port = args.port, "Starting API server");

    let config = load_config(args.config.as_deref()).await?;
    let state = api::create_app_state(&args.db, config)?;
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| VigilError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

pub async fn load_config(path: Option<&str>) -> Result<EngineConfig, VigilError> {
    match path {
        Some(path) => config::parse_config(std::path::Path::new(path)).await,
        None => Ok(EngineConfig::default()),
    }
}
