pub mod garment;
pub mod wear_log;
pub mod weather;

pub use garment::{DressCode, Garment, GarmentKind, GarmentUpdate, NewGarment};
pub use wear_log::{WearLog, WearMetadata};
pub use weather::{ForecastResponse, Weather, WeatherTarget};
