pub mod candidates;
pub mod color;
pub mod sample_closet;
pub mod scoring;
pub mod suggestions;
pub mod targets;
pub mod weather;

pub use suggestions::{suggest_outfits, OutfitEngine, OutfitSuggestion, SuggestOptions, SuggestionLimits};
pub use targets::derive_target;
pub use weather::{fetch_weather_or_default, WeatherProvider};
