use serde::{Deserialize, Serialize};

/// Snapshot of the conditions an outfit is picked for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Air temperature in °C
    pub temp_c: f64,
    /// Probability of rain, 0..1
    pub chance_of_rain: f64,
    /// Wind speed in kph
    pub wind_kph: f64,
    pub is_snow: bool,
}

impl Default for Weather {
    /// Mild, dry day used whenever the weather source is unavailable
    fn default() -> Self {
        Self {
            temp_c: 20.0,
            chance_of_rain: 0.1,
            wind_kph: 8.0,
            is_snow: false,
        }
    }
}

/// Per-slot warmth requirements derived from a [`Weather`] reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherTarget {
    pub outer_required: bool,
    pub top_warmth: u8,
    pub bottom_warmth: u8,
    pub shoe_warmth: u8,
    pub outer_warmth: u8,
    pub need_waterproof: bool,
}

// ============================================================================
// Open-Meteo API Types
// ============================================================================

/// Raw response from the Open-Meteo forecast endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current: Option<ForecastCurrent>,
    #[serde(default)]
    pub daily: Option<ForecastDaily>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastCurrent {
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    /// Open-Meteo reports wind in km/h by default
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    /// Snowfall over the preceding hour, in cm
    #[serde(default)]
    pub snowfall: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastDaily {
    /// Percent, one entry per forecast day
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

impl From<ForecastResponse> for Weather {
    fn from(forecast: ForecastResponse) -> Self {
        let fallback = Weather::default();
        let current = forecast.current.unwrap_or_default();

        let rain_percent = forecast
            .daily
            .and_then(|d| d.precipitation_probability_max.into_iter().next().flatten())
            .unwrap_or(0.0);

        Weather {
            temp_c: current.temperature_2m.unwrap_or(fallback.temp_c),
            chance_of_rain: (rain_percent / 100.0).clamp(0.0, 1.0),
            wind_kph: current.wind_speed_10m.unwrap_or(fallback.wind_kph),
            is_snow: current.snowfall.is_some_and(|cm| cm > 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weather_is_documented_fallback() {
        let weather = Weather::default();
        assert_eq!(weather.temp_c, 20.0);
        assert_eq!(weather.chance_of_rain, 0.1);
        assert_eq!(weather.wind_kph, 8.0);
        assert!(!weather.is_snow);
    }

    #[test]
    fn test_forecast_to_weather() {
        let json = r#"{
            "current": { "temperature_2m": 3.4, "wind_speed_10m": 22.0, "snowfall": 0.7 },
            "daily": { "precipitation_probability_max": [65, 10] }
        }"#;

        let forecast: ForecastResponse = serde_json::from_str(json).unwrap();
        let weather = Weather::from(forecast);
        assert_eq!(weather.temp_c, 3.4);
        assert_eq!(weather.wind_kph, 22.0);
        assert_eq!(weather.chance_of_rain, 0.65);
        assert!(weather.is_snow);
    }

    #[test]
    fn test_forecast_missing_fields_fall_back() {
        let forecast: ForecastResponse = serde_json::from_str("{}").unwrap();
        let weather = Weather::from(forecast);
        assert_eq!(weather.temp_c, 20.0);
        assert_eq!(weather.wind_kph, 8.0);
        assert_eq!(weather.chance_of_rain, 0.0);
        assert!(!weather.is_snow);
    }

    #[test]
    fn test_forecast_null_precipitation_entry() {
        let json = r#"{ "daily": { "precipitation_probability_max": [null] } }"#;
        let forecast: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(Weather::from(forecast).chance_of_rain, 0.0);
    }
}
