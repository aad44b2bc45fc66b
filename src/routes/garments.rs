use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Garment, GarmentUpdate, NewGarment},
    routes::AppState,
    services::sample_closet::sample_garments,
};

#[derive(Debug, Serialize)]
pub struct CreatedGarment {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SamplesAdded {
    pub added: usize,
}

/// Lists the whole closet, least-worn first
pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Garment>>> {
    Ok(Json(state.store.get_all_garments().await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(garment): Json<NewGarment>,
) -> AppResult<(StatusCode, Json<CreatedGarment>)> {
    let id = state.store.add_garment(garment).await?;

    tracing::info!(request_id = %request_id, garment_id = %id, "Garment created");

    Ok((StatusCode::CREATED, Json(CreatedGarment { id })))
}

/// Seeds the closet with the sample garments
pub async fn add_samples(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<SamplesAdded>> {
    let mut added = 0;
    for garment in sample_garments() {
        let name = garment.name.clone();
        match state.store.add_garment(garment).await {
            Ok(_) => added += 1,
            Err(e) => tracing::warn!(request_id = %request_id, error = %e, name = ?name, "Failed to add sample garment"),
        }
    }

    tracing::info!(request_id = %request_id, added, "Sample garments added");

    Ok(Json(SamplesAdded { added }))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Garment>> {
    Ok(Json(state.store.get_garment(id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(update): Json<GarmentUpdate>,
) -> AppResult<Json<Garment>> {
    let garment = state.store.update_garment(id, update).await?;

    tracing::info!(request_id = %request_id, garment_id = %id, "Garment updated");

    Ok(Json(garment))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.store.delete_garment(id).await?;

    tracing::info!(request_id = %request_id, garment_id = %id, "Garment deleted");

    Ok(StatusCode::NO_CONTENT)
}
