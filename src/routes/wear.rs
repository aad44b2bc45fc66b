use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{DressCode, Weather, WearLog, WearMetadata},
    routes::AppState,
};

const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct WearRequest {
    pub garment_ids: Vec<Uuid>,
    #[serde(default)]
    pub dress_code: Option<DressCode>,
    #[serde(default)]
    pub weather: Option<Weather>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

/// Confirms an outfit as worn
pub async fn log(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<WearRequest>,
) -> AppResult<(StatusCode, Json<WearLog>)> {
    let metadata = WearMetadata {
        weather: request.weather,
        dress_code: request.dress_code,
    };
    let log = state.store.log_wear(&request.garment_ids, metadata).await?;

    tracing::info!(
        request_id = %request_id,
        wear_log_id = %log.id,
        garments = log.garment_ids.len(),
        "Outfit worn"
    );

    Ok((StatusCode::CREATED, Json(log)))
}

/// Wear history, newest first
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<Vec<WearLog>>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(Json(state.store.wear_logs(limit).await?))
}
