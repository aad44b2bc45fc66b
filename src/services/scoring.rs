use std::collections::BTreeSet;

use crate::models::{Garment, GarmentKind};
use crate::services::color::{has_complementary_pair, is_neutral, same_family};

/// Rotation bonus an item earns before it has ever been worn
pub const ROTATION_CEILING: i32 = 3;

/// Deterministic part of an outfit's ranking key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutfitScore {
    pub style: i32,
    pub rotation: i32,
}

impl OutfitScore {
    pub fn total(&self) -> i32 {
        self.style + self.rotation
    }
}

/// Scores the items actually present in an outfit (no empty slots)
pub fn score_outfit(items: &[&Garment]) -> OutfitScore {
    OutfitScore {
        style: style_score(items),
        rotation: rotation_bonus(items),
    }
}

/// Color coherence of the pooled colors, plus shoe and favorite bonuses
pub fn style_score(items: &[&Garment]) -> i32 {
    let colors: Vec<String> = items
        .iter()
        .flat_map(|g| g.normalized_colors())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let neutrals = colors.iter().filter(|c| is_neutral(c)).count();
    let accents = colors.len() - neutrals;

    let mut score = 0;
    if neutrals >= 2 {
        score += 3;
    }
    if accents == 1 {
        score += 2;
    }
    if has_complementary_pair(&colors) {
        score += 2;
    }
    if same_family(&colors) {
        score += 2;
    }
    if accents > 2 {
        score -= 3;
    }

    if let Some(shoe) = items.iter().find(|g| g.kind == GarmentKind::Shoe) {
        let shoe_colors: Vec<String> = shoe.normalized_colors().collect();
        if shoe_colors.iter().any(|c| is_neutral(c)) {
            score += 2;
        }
        if shoe_colors.iter().any(|c| !is_neutral(c)) {
            score += 1;
        }
    }

    score + 2 * items.iter().filter(|g| g.favorite).count() as i32
}

/// Favors rarely worn items; saturates at zero from three wears on
pub fn rotation_bonus(items: &[&Garment]) -> i32 {
    items
        .iter()
        .map(|g| (ROTATION_CEILING - g.times_worn.min(ROTATION_CEILING as u32) as i32).max(0))
        .sum()
}
