use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Warmth assumed for records that never had one set
pub const DEFAULT_WARMTH: u8 = 2;

/// Allowed range of the subjective insulation rating
pub const WARMTH_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Which outfit slot a garment can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentKind {
    Top,
    Bottom,
    Outerwear,
    Shoe,
    Accessory,
}

impl GarmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentKind::Top => "top",
            GarmentKind::Bottom => "bottom",
            GarmentKind::Outerwear => "outerwear",
            GarmentKind::Shoe => "shoe",
            GarmentKind::Accessory => "accessory",
        }
    }
}

impl Display for GarmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(GarmentKind::Top),
            "bottom" => Ok(GarmentKind::Bottom),
            "outerwear" => Ok(GarmentKind::Outerwear),
            "shoe" => Ok(GarmentKind::Shoe),
            "accessory" => Ok(GarmentKind::Accessory),
            other => Err(AppError::InvalidInput(format!(
                "Unknown garment type: {}",
                other
            ))),
        }
    }
}

/// Usage context a garment is appropriate for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DressCode {
    Casual,
    SmartCasual,
    Business,
    Sport,
}

impl DressCode {
    pub const ALL: [DressCode; 4] = [
        DressCode::Casual,
        DressCode::SmartCasual,
        DressCode::Business,
        DressCode::Sport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DressCode::Casual => "casual",
            DressCode::SmartCasual => "smart_casual",
            DressCode::Business => "business",
            DressCode::Sport => "sport",
        }
    }
}

impl Display for DressCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DressCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DressCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown dress code: {}", s)))
    }
}

fn default_warmth() -> u8 {
    DEFAULT_WARMTH
}

/// One physical clothing item in the closet
///
/// Deserialization is lenient: records missing warmth, wear counters or
/// flags get the same defaults a freshly tagged garment would have.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Garment {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: GarmentKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "default_warmth")]
    pub warmth: u8,
    #[serde(default)]
    pub water_resistant: bool,
    pub dress_codes: Vec<DressCode>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub last_worn_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub times_worn: u32,
    #[serde(default)]
    pub is_dirty: bool,
    #[serde(default)]
    pub favorite: bool,
}

impl Garment {
    /// Creates a clean, never-worn garment
    pub fn new(kind: GarmentKind, colors: Vec<String>, warmth: u8, dress_codes: Vec<DressCode>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: None,
            colors,
            warmth,
            water_resistant: false,
            dress_codes,
            image_uri: None,
            last_worn_at: None,
            times_worn: 0,
            is_dirty: false,
            favorite: false,
        }
    }

    pub fn suits(&self, dress_code: DressCode) -> bool {
        self.dress_codes.contains(&dress_code)
    }

    /// Lower-cased color names, the form every color rule compares against
    pub fn normalized_colors(&self) -> impl Iterator<Item = String> + '_ {
        self.colors.iter().map(|c| c.trim().to_lowercase())
    }

    /// Records one wear at `worn_at`; shoes don't go to the laundry
    pub fn record_wear(&mut self, worn_at: DateTime<Utc>) {
        self.times_worn += 1;
        self.last_worn_at = Some(worn_at);
        if self.kind != GarmentKind::Shoe {
            self.is_dirty = true;
        }
    }
}

/// Payload for adding a garment
#[derive(Debug, Clone, Deserialize)]
pub struct NewGarment {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: GarmentKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "default_warmth")]
    pub warmth: u8,
    #[serde(default)]
    pub water_resistant: bool,
    pub dress_codes: Vec<DressCode>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl NewGarment {
    pub fn validate(&self) -> AppResult<()> {
        validate_warmth(self.warmth)?;
        validate_dress_codes(&self.dress_codes)
    }

    /// Builds the stored garment, keeping a caller-supplied id if present
    pub fn into_garment(self) -> Garment {
        Garment {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            kind: self.kind,
            name: self.name,
            colors: self.colors,
            warmth: self.warmth,
            water_resistant: self.water_resistant,
            dress_codes: self.dress_codes,
            image_uri: self.image_uri,
            last_worn_at: None,
            times_worn: 0,
            is_dirty: false,
            favorite: self.favorite,
        }
    }
}

/// Partial update of a garment's user-editable fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GarmentUpdate {
    pub name: Option<String>,
    pub colors: Option<Vec<String>>,
    pub warmth: Option<u8>,
    pub water_resistant: Option<bool>,
    pub dress_codes: Option<Vec<DressCode>>,
    pub image_uri: Option<String>,
    pub is_dirty: Option<bool>,
    pub favorite: Option<bool>,
}

impl GarmentUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(warmth) = self.warmth {
            validate_warmth(warmth)?;
        }
        if let Some(dress_codes) = &self.dress_codes {
            validate_dress_codes(dress_codes)?;
        }
        Ok(())
    }

    pub fn apply(self, garment: &mut Garment) {
        if let Some(name) = self.name {
            garment.name = Some(name);
        }
        if let Some(colors) = self.colors {
            garment.colors = colors;
        }
        if let Some(warmth) = self.warmth {
            garment.warmth = warmth;
        }
        if let Some(water_resistant) = self.water_resistant {
            garment.water_resistant = water_resistant;
        }
        if let Some(dress_codes) = self.dress_codes {
            garment.dress_codes = dress_codes;
        }
        if let Some(image_uri) = self.image_uri {
            garment.image_uri = Some(image_uri);
        }
        if let Some(is_dirty) = self.is_dirty {
            garment.is_dirty = is_dirty;
        }
        if let Some(favorite) = self.favorite {
            garment.favorite = favorite;
        }
    }
}

fn validate_warmth(warmth: u8) -> AppResult<()> {
    if WARMTH_RANGE.contains(&warmth) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Warmth must be between 1 and 5, got {}",
            warmth
        )))
    }
}

fn validate_dress_codes(dress_codes: &[DressCode]) -> AppResult<()> {
    if dress_codes.is_empty() {
        return Err(AppError::InvalidInput(
            "Garment needs at least one dress code".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garment_deserialization_applies_defaults() {
        let json = r#"{
            "id": "7f1b8a52-3c0e-4c8f-9d57-1c2f7f0b9a11",
            "type": "top",
            "colors": ["White"],
            "dress_codes": ["casual"]
        }"#;

        let garment: Garment = serde_json::from_str(json).unwrap();
        assert_eq!(garment.kind, GarmentKind::Top);
        assert_eq!(garment.warmth, DEFAULT_WARMTH);
        assert_eq!(garment.times_worn, 0);
        assert!(!garment.is_dirty);
        assert!(!garment.favorite);
        assert!(!garment.water_resistant);
        assert_eq!(garment.last_worn_at, None);
    }

    #[test]
    fn test_dress_code_serde_snake_case() {
        let json = serde_json::to_string(&DressCode::SmartCasual).unwrap();
        assert_eq!(json, r#""smart_casual""#);
        assert_eq!("smart_casual".parse::<DressCode>().unwrap(), DressCode::SmartCasual);
        assert!("formal".parse::<DressCode>().is_err());
    }

    #[test]
    fn test_garment_kind_from_str() {
        assert_eq!("outerwear".parse::<GarmentKind>().unwrap(), GarmentKind::Outerwear);
        assert!("hat".parse::<GarmentKind>().is_err());
    }

    #[test]
    fn test_record_wear_marks_dirty_except_shoes() {
        let now = Utc::now();
        let mut top = Garment::new(GarmentKind::Top, vec!["white".into()], 2, vec![DressCode::Casual]);
        let mut shoe = Garment::new(GarmentKind::Shoe, vec!["white".into()], 1, vec![DressCode::Casual]);

        top.record_wear(now);
        shoe.record_wear(now);

        assert_eq!(top.times_worn, 1);
        assert!(top.is_dirty);
        assert_eq!(top.last_worn_at, Some(now));
        assert_eq!(shoe.times_worn, 1);
        assert!(!shoe.is_dirty);
    }

    #[test]
    fn test_new_garment_validation() {
        let mut new = NewGarment {
            id: None,
            kind: GarmentKind::Top,
            name: None,
            colors: vec!["red".into()],
            warmth: 6,
            water_resistant: false,
            dress_codes: vec![DressCode::Casual],
            image_uri: None,
            favorite: false,
        };
        assert!(matches!(new.validate(), Err(AppError::InvalidInput(_))));

        new.warmth = 3;
        new.dress_codes.clear();
        assert!(matches!(new.validate(), Err(AppError::InvalidInput(_))));

        new.dress_codes.push(DressCode::Sport);
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut garment = Garment::new(GarmentKind::Bottom, vec!["navy".into()], 2, vec![DressCode::Casual]);
        garment.is_dirty = true;

        let update = GarmentUpdate {
            is_dirty: Some(false),
            favorite: Some(true),
            ..Default::default()
        };
        update.apply(&mut garment);

        assert!(!garment.is_dirty);
        assert!(garment.favorite);
        assert_eq!(garment.colors, vec!["navy".to_string()]);
        assert_eq!(garment.warmth, 2);
    }
}
