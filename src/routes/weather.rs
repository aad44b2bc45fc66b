use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Weather, WeatherTarget},
    routes::{outfits::Location, AppState},
    services::{derive_target, fetch_weather_or_default},
};

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub weather: Weather,
    pub target: WeatherTarget,
}

/// Current weather for a location and the warmth targets it implies
pub async fn current(
    State(state): State<Arc<AppState>>,
    Query(location): Query<Location>,
) -> AppResult<Json<WeatherResponse>> {
    let weather =
        fetch_weather_or_default(state.weather.as_ref(), location.latitude, location.longitude)
            .await;

    Ok(Json(WeatherResponse {
        target: derive_target(&weather),
        weather,
    }))
}
