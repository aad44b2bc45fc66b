use crate::models::{Weather, WeatherTarget};

/// Wind speed (kph) from which outerwear needs one extra warmth level
pub const WINDY_KPH: f64 = 20.0;

/// Rain probability from which outerwear and shoes must be water resistant
pub const RAINY_CHANCE: f64 = 0.4;

const MAX_WARMTH: u8 = 5;

/// Maps a weather reading to per-slot warmth targets.
///
/// | °C          | outerwear | top/bottom/shoe | outerwear warmth |
/// |-------------|-----------|-----------------|------------------|
/// | ≤ 5         | required  | 3               | 5                |
/// | (5, 12]     | required  | 2               | 4                |
/// | (12, 19]    | optional  | 2               | 3                |
/// | > 19        | optional  | 1               | 0                |
///
/// Total: a NaN temperature compares false everywhere and lands in the
/// mildest band.
pub fn derive_target(weather: &Weather) -> WeatherTarget {
    let c = weather.temp_c;
    let (outer_required, base_warmth, mut outer_warmth) = if c <= 5.0 {
        (true, 3, 5)
    } else if c <= 12.0 {
        (true, 2, 4)
    } else if c <= 19.0 {
        (false, 2, 3)
    } else {
        (false, 1, 0)
    };

    if weather.wind_kph >= WINDY_KPH {
        outer_warmth = (outer_warmth + 1).min(MAX_WARMTH);
    }

    WeatherTarget {
        outer_required,
        top_warmth: base_warmth,
        bottom_warmth: base_warmth,
        shoe_warmth: base_warmth,
        outer_warmth,
        need_waterproof: weather.chance_of_rain >= RAINY_CHANCE || weather.is_snow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn weather(temp_c: f64, chance_of_rain: f64, wind_kph: f64, is_snow: bool) -> Weather {
        Weather {
            temp_c,
            chance_of_rain,
            wind_kph,
            is_snow,
        }
    }

    #[test]
    fn test_band_edges() {
        let t = derive_target(&weather(5.0, 0.0, 0.0, false));
        assert!(t.outer_required);
        assert_eq!((t.top_warmth, t.outer_warmth), (3, 5));

        let t = derive_target(&weather(5.1, 0.0, 0.0, false));
        assert!(t.outer_required);
        assert_eq!((t.top_warmth, t.outer_warmth), (2, 4));

        let t = derive_target(&weather(12.0, 0.0, 0.0, false));
        assert_eq!((t.top_warmth, t.outer_warmth), (2, 4));

        let t = derive_target(&weather(19.0, 0.0, 0.0, false));
        assert!(!t.outer_required);
        assert_eq!((t.top_warmth, t.outer_warmth), (2, 3));

        let t = derive_target(&weather(19.5, 0.0, 0.0, false));
        assert!(!t.outer_required);
        assert_eq!((t.top_warmth, t.bottom_warmth, t.shoe_warmth, t.outer_warmth), (1, 1, 1, 0));
    }

    #[test]
    fn test_wind_bumps_outerwear() {
        assert_eq!(derive_target(&weather(15.0, 0.0, 20.0, false)).outer_warmth, 4);
        assert_eq!(derive_target(&weather(25.0, 0.0, 30.0, false)).outer_warmth, 1);
        assert_eq!(derive_target(&weather(15.0, 0.0, 19.9, false)).outer_warmth, 3);
    }

    #[test]
    fn test_waterproofing() {
        assert!(derive_target(&weather(15.0, 0.4, 0.0, false)).need_waterproof);
        assert!(derive_target(&weather(-2.0, 0.0, 0.0, true)).need_waterproof);
        assert!(!derive_target(&weather(15.0, 0.39, 0.0, false)).need_waterproof);
    }

    #[test]
    fn test_nan_readings_stay_total() {
        let t = derive_target(&weather(f64::NAN, f64::NAN, f64::NAN, false));
        assert!(!t.outer_required);
        assert_eq!((t.top_warmth, t.outer_warmth), (1, 0));
        assert!(!t.need_waterproof);
    }

    proptest! {
        #[test]
        fn cold_weather_requires_heavy_layers(temp in -60.0f64..=5.0, rain in 0.0f64..=1.0) {
            let t = derive_target(&weather(temp, rain, 0.0, false));
            prop_assert!(t.outer_required);
            prop_assert_eq!((t.top_warmth, t.bottom_warmth, t.shoe_warmth), (3, 3, 3));
            prop_assert_eq!(t.outer_warmth, 5);
        }

        #[test]
        fn wind_adds_one_outer_level_capped(temp in -40.0f64..50.0, wind in 20.0f64..150.0) {
            let calm = derive_target(&weather(temp, 0.0, 0.0, false));
            let windy = derive_target(&weather(temp, 0.0, wind, false));
            prop_assert_eq!(windy.outer_warmth, (calm.outer_warmth + 1).min(5));
            prop_assert_eq!(windy.top_warmth, calm.top_warmth);
        }

        #[test]
        fn rain_or_snow_needs_waterproofing(temp in -40.0f64..50.0, rain in 0.4f64..=1.0, snow: bool) {
            prop_assert!(derive_target(&weather(temp, rain, 0.0, snow)).need_waterproof);
            prop_assert!(derive_target(&weather(temp, 0.0, 0.0, true)).need_waterproof);
        }
    }
}
