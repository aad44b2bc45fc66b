/// Weather data sources
///
/// The outfit engine only ever sees a [`Weather`] value. Providers fetch
/// one for a location; [`fetch_weather_or_default`] turns any failure into
/// the documented default reading so a request can always be served.
use crate::{error::AppResult, models::Weather};

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Trait for current-conditions providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at the given coordinates
    async fn fetch_weather(&self, latitude: f64, longitude: f64) -> AppResult<Weather>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Fetches weather, falling back to [`Weather::default`] on any failure
pub async fn fetch_weather_or_default(
    provider: &dyn WeatherProvider,
    latitude: f64,
    longitude: f64,
) -> Weather {
    match provider.fetch_weather(latitude, longitude).await {
        Ok(weather) => weather,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = provider.name(),
                latitude,
                longitude,
                "Weather fetch failed, using default reading"
            );
            Weather::default()
        }
    }
}

pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(crate::error::AppError::InvalidInput(format!(
            "Coordinates out of range: {}, {}",
            latitude, longitude
        )));
    }
    Ok(())
}
