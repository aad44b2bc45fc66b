use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::{error::AppResult, services::color::suggested_palette};

#[derive(Debug, Deserialize)]
pub struct PaletteQuery {
    /// Comma-separated color names
    #[serde(default)]
    colors: String,
}

#[derive(Debug, Serialize)]
pub struct PaletteResponse {
    pub palette: Vec<String>,
}

/// Extracted colors plus companion neutrals
pub async fn palette(Query(query): Query<PaletteQuery>) -> AppResult<Json<PaletteResponse>> {
    let colors: Vec<&str> = query
        .colors
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    Ok(Json(PaletteResponse {
        palette: suggested_palette(&colors),
    }))
}
