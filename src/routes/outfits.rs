use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{DressCode, Garment, Weather, WeatherTarget},
    routes::AppState,
    services::{fetch_weather_or_default, OutfitSuggestion, SuggestOptions},
};

/// Upper bound on suggestions returned for one request
pub const MAX_SUGGESTIONS: usize = 20;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub dress_code: DressCode,
    #[serde(default)]
    pub days_no_repeat: Option<u32>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Clamped to [`MAX_SUGGESTIONS`]
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Used as-is when present; otherwise fetched for `location`
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Serialize)]
pub struct OutfitView {
    pub top: Garment,
    pub bottom: Garment,
    pub outerwear: Option<Garment>,
    pub shoe: Garment,
}

impl From<OutfitSuggestion<'_>> for OutfitView {
    fn from(outfit: OutfitSuggestion<'_>) -> Self {
        Self {
            top: outfit.top.clone(),
            bottom: outfit.bottom.clone(),
            outerwear: outfit.outerwear.cloned(),
            shoe: outfit.shoe.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub weather: Weather,
    pub target: WeatherTarget,
    pub suggestions: Vec<OutfitView>,
}

/// Resolves the weather for a request: explicit reading, then a fetch for
/// the location, then the default reading
pub(crate) async fn resolve_weather(
    state: &AppState,
    weather: Option<Weather>,
    location: Option<Location>,
) -> Weather {
    match (weather, location) {
        (Some(weather), _) => weather,
        (None, Some(loc)) => {
            fetch_weather_or_default(state.weather.as_ref(), loc.latitude, loc.longitude).await
        }
        (None, None) => Weather::default(),
    }
}

/// Handler for outfit suggestions
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SuggestRequest>,
) -> AppResult<Json<SuggestResponse>> {
    tracing::info!(
        request_id = %request_id,
        dress_code = %request.dress_code,
        "Processing outfit suggestion request"
    );

    let weather = resolve_weather(&state, request.weather, request.location).await;
    let garments = state.store.get_all_garments().await?;

    let options = SuggestOptions::new(request.dress_code)
        .with_days_no_repeat(request.days_no_repeat.unwrap_or(state.default_days_no_repeat))
        .at(request.now.unwrap_or_else(Utc::now));
    let max_results = request
        .max_results
        .unwrap_or(state.default_max_results)
        .min(MAX_SUGGESTIONS);

    let (target, suggestions) = {
        let mut rng = rand::rng();
        let (target, outfits) =
            state
                .engine
                .suggest_with_target(&garments, &weather, &options, max_results, &mut rng);
        (
            target,
            outfits.into_iter().map(OutfitView::from).collect::<Vec<_>>(),
        )
    };

    tracing::info!(
        request_id = %request_id,
        closet = garments.len(),
        suggestions = suggestions.len(),
        "Outfit suggestions ready"
    );

    Ok(Json(SuggestResponse {
        weather,
        target,
        suggestions,
    }))
}
