use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{error::AppResult, middleware::request_id::RequestId, models::Garment, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct CleanRequest {
    /// Empty or absent cleans every dirty garment
    #[serde(default)]
    pub garment_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CleanResponse {
    pub cleaned: u64,
}

/// Dirty garments waiting for the wash
pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Garment>>> {
    let dirty = state
        .store
        .get_all_garments()
        .await?
        .into_iter()
        .filter(|g| g.is_dirty)
        .collect();
    Ok(Json(dirty))
}

pub async fn clean(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CleanRequest>,
) -> AppResult<Json<CleanResponse>> {
    let cleaned = state.store.mark_clean(&request.garment_ids).await?;

    tracing::info!(request_id = %request_id, cleaned, "Laundry done");

    Ok(Json(CleanResponse { cleaned }))
}
