use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DressCode, Weather};

/// Context captured alongside a wear event
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WearMetadata {
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub dress_code: Option<DressCode>,
}

/// One confirmed outfit in the wear history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WearLog {
    pub id: Uuid,
    pub garment_ids: Vec<Uuid>,
    pub worn_at: DateTime<Utc>,
    pub weather: Option<Weather>,
    pub dress_code: Option<DressCode>,
}

impl WearLog {
    pub fn new(garment_ids: Vec<Uuid>, worn_at: DateTime<Utc>, metadata: WearMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            garment_ids,
            worn_at,
            weather: metadata.weather,
            dress_code: metadata.dress_code,
        }
    }
}
