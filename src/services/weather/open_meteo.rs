/// Open-Meteo forecast provider
///
/// Keyless API. One request per location returns current temperature,
/// wind and snowfall plus today's maximum precipitation probability.
/// Readings are cached in Redis per rounded coordinate pair.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ForecastResponse, Weather},
    services::weather::{validate_coordinates, WeatherProvider},
};
use reqwest::Client as HttpClient;

const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m,snowfall";
const DAILY_FIELDS: &str = "precipitation_probability_max";

#[derive(Clone)]
pub struct OpenMeteoProvider {
    http_client: HttpClient,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
}

impl OpenMeteoProvider {
    pub fn new(cache: Cache, api_url: String, cache_ttl: u64) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        }
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.api_url)
    }

    fn forecast_query(latitude: f64, longitude: f64) -> [(&'static str, String); 5] {
        [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ]
    }

    async fn call_api(&self, latitude: f64, longitude: f64) -> AppResult<Weather> {
        let response = self
            .http_client
            .get(self.forecast_url())
            .query(&Self::forecast_query(latitude, longitude))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Open-Meteo API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let forecast: ForecastResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize Open-Meteo response"
            );
            AppError::ExternalApi(format!("Failed to parse Open-Meteo response: {}", e))
        })?;

        let weather = Weather::from(forecast);

        tracing::info!(
            latitude,
            longitude,
            temp_c = weather.temp_c,
            chance_of_rain = weather.chance_of_rain,
            wind_kph = weather.wind_kph,
            is_snow = weather.is_snow,
            provider = "open_meteo",
            "Weather fetched"
        );

        Ok(weather)
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_weather(&self, latitude: f64, longitude: f64) -> AppResult<Weather> {
        validate_coordinates(latitude, longitude)?;

        cached!(
            self.cache,
            CacheKey::weather(latitude, longitude),
            self.cache_ttl,
            async move { self.call_api(latitude, longitude).await }
        )
    }

    fn name(&self) -> &'static str {
        "open_meteo"
    }
}
