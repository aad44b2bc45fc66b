//! Starter closet for trying the service without entering garments by hand.

use crate::models::{DressCode, GarmentKind, NewGarment};

use DressCode::{Business, Casual, SmartCasual, Sport};
use GarmentKind::{Bottom, Outerwear, Shoe, Top};

struct SampleGarment {
    kind: GarmentKind,
    name: &'static str,
    colors: &'static [&'static str],
    warmth: u8,
    dress_codes: &'static [DressCode],
    water_resistant: bool,
}

const fn sample(
    kind: GarmentKind,
    name: &'static str,
    colors: &'static [&'static str],
    warmth: u8,
    dress_codes: &'static [DressCode],
    water_resistant: bool,
) -> SampleGarment {
    SampleGarment {
        kind,
        name,
        colors,
        warmth,
        dress_codes,
        water_resistant,
    }
}

const SAMPLE_CLOSET: &[SampleGarment] = &[
    sample(Top, "White T-Shirt", &["white"], 1, &[Casual], false),
    sample(Top, "Black Dress Shirt", &["black"], 2, &[Business, SmartCasual], false),
    sample(Top, "Blue Oxford Shirt", &["blue"], 2, &[Business, SmartCasual], false),
    sample(Top, "Gray Hoodie", &["gray"], 3, &[Casual, Sport], false),
    sample(Top, "Red Polo", &["red"], 1, &[Casual, SmartCasual], false),
    sample(Top, "Green Sweater", &["green"], 3, &[Casual, SmartCasual], false),
    sample(Bottom, "Blue Jeans", &["blue"], 2, &[Casual], false),
    sample(Bottom, "Black Dress Pants", &["black"], 2, &[Business, SmartCasual], false),
    sample(Bottom, "Khaki Chinos", &["brown"], 2, &[Casual, SmartCasual], false),
    sample(Bottom, "Gray Sweatpants", &["gray"], 2, &[Casual, Sport], false),
    sample(Bottom, "Navy Shorts", &["navy"], 1, &[Casual, Sport], false),
    sample(Shoe, "White Sneakers", &["white"], 1, &[Casual, Sport], false),
    sample(Shoe, "Black Dress Shoes", &["black"], 1, &[Business, SmartCasual], false),
    sample(Shoe, "Brown Loafers", &["brown"], 1, &[Casual, SmartCasual], false),
    sample(Shoe, "Running Shoes", &["gray", "orange"], 1, &[Sport, Casual], false),
    sample(Outerwear, "Black Leather Jacket", &["black"], 3, &[Casual, SmartCasual], true),
    sample(Outerwear, "Navy Blazer", &["navy"], 2, &[Business, SmartCasual], false),
    sample(Outerwear, "Rain Jacket", &["yellow"], 2, &[Casual, Sport], true),
    sample(Outerwear, "Winter Coat", &["gray"], 5, &[Casual, Business], true),
];

/// Garments for a fresh closet, ready to pass to a store's `add_garment`
pub fn sample_garments() -> Vec<NewGarment> {
    SAMPLE_CLOSET
        .iter()
        .map(|s| NewGarment {
            id: None,
            kind: s.kind,
            name: Some(s.name.to_string()),
            colors: s.colors.iter().map(|c| c.to_string()).collect(),
            warmth: s.warmth,
            water_resistant: s.water_resistant,
            dress_codes: s.dress_codes.to_vec(),
            image_uri: None,
            favorite: false,
        })
        .collect()
}
