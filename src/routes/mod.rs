use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db::GarmentStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{OutfitEngine, WeatherProvider},
};

pub mod colors;
pub mod garments;
pub mod laundry;
pub mod outfits;
pub mod wear;
pub mod weather;

/// Shared state for all handlers
pub struct AppState {
    pub store: Arc<dyn GarmentStore>,
    pub weather: Arc<dyn WeatherProvider>,
    pub engine: OutfitEngine,
    pub default_days_no_repeat: u32,
    pub default_max_results: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn GarmentStore>,
        weather: Arc<dyn WeatherProvider>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            weather,
            engine: OutfitEngine::new(config.suggestion_limits()),
            default_days_no_repeat: config.default_days_no_repeat,
            default_max_results: config.default_max_results,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/garments", get(garments::list).post(garments::create))
        .route("/garments/samples", post(garments::add_samples))
        .route(
            "/garments/:id",
            get(garments::get).patch(garments::update).delete(garments::delete),
        )
        .route("/outfits/suggest", post(outfits::suggest))
        .route("/wear", get(wear::history).post(wear::log))
        .route("/laundry", get(laundry::list))
        .route("/laundry/clean", post(laundry::clean))
        .route("/weather", get(weather::current))
        .route("/colors/palette", get(colors::palette))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
