use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::errors::VigilError;
use crate::models::HistoryEntry;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Most-recent-first scan history, as a bare JSON array.
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<HistoryEntry>>, VigilError> {
    let limit = query.limit.unwrap_or(20).min(200);
    let offset = query.offset.unwrap_or(0);

    let entries = state.db.list_history(limit, offset)?;
    Ok(Json(entries))
}
