use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::{DressCode, Garment, Weather, WeatherTarget};
use crate::services::candidates::{CandidateFilter, CandidatePools};
use crate::services::scoring::score_outfit;
use crate::services::targets::derive_target;

/// Tunables bounding the diversified search.
///
/// The caps keep each round's Cartesian product small; they are a
/// pragmatic bound rather than anything the ranking depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionLimits {
    /// Unused tops, bottoms and shoes expanded per round
    pub slot_cap: usize,
    /// Unused outerwear expanded per round
    pub outerwear_cap: usize,
    /// Scores get a uniform jitter in `[0, jitter)`; zero or a non-finite
    /// value disables it
    pub jitter: f64,
}

impl Default for SuggestionLimits {
    fn default() -> Self {
        Self {
            slot_cap: 5,
            outerwear_cap: 3,
            jitter: 2.0,
        }
    }
}

/// Per-request constraints
#[derive(Debug, Clone, Copy)]
pub struct SuggestOptions {
    pub dress_code: DressCode,
    /// Days a garment rests after being worn
    pub days_no_repeat: u32,
    pub now: DateTime<Utc>,
}

impl SuggestOptions {
    pub fn new(dress_code: DressCode) -> Self {
        Self {
            dress_code,
            days_no_repeat: 2,
            now: Utc::now(),
        }
    }

    pub fn with_days_no_repeat(mut self, days: u32) -> Self {
        self.days_no_repeat = days;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// A complete outfit pointing into the caller's closet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutfitSuggestion<'a> {
    pub top: &'a Garment,
    pub bottom: &'a Garment,
    pub outerwear: Option<&'a Garment>,
    pub shoe: &'a Garment,
}

impl<'a> OutfitSuggestion<'a> {
    pub fn items(&self) -> Vec<&'a Garment> {
        let mut items = vec![self.top, self.bottom];
        items.extend(self.outerwear);
        items.push(self.shoe);
        items
    }

    pub fn garment_ids(&self) -> Vec<Uuid> {
        self.items().iter().map(|g| g.id).collect()
    }

    /// Identity used to skip repeats when topping up results; outerwear
    /// is deliberately not part of it.
    fn key(&self) -> (Uuid, Uuid, Uuid) {
        (self.top.id, self.bottom.id, self.shoe.id)
    }
}

/// Outfit recommendation engine.
///
/// Holds only tunables, so one instance can serve concurrent requests;
/// randomness comes from the rng passed to each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutfitEngine {
    limits: SuggestionLimits,
}

impl OutfitEngine {
    pub fn new(limits: SuggestionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> SuggestionLimits {
        self.limits
    }

    /// Ranks up to `max_results` outfits for the weather and dress code.
    ///
    /// Returns fewer (possibly none) when the closet can't supply enough
    /// clean, rested, weather-appropriate items.
    pub fn suggest<'a, R: Rng>(
        &self,
        garments: &'a [Garment],
        weather: &Weather,
        options: &SuggestOptions,
        max_results: usize,
        rng: &mut R,
    ) -> Vec<OutfitSuggestion<'a>> {
        let target = derive_target(weather);
        let filter = CandidateFilter {
            dress_code: options.dress_code,
            days_no_repeat: options.days_no_repeat,
            now: options.now,
        };
        let pools = filter.build_pools(garments, &target);
        let suggestions = self.suggest_from_pools(&pools, max_results, rng);

        tracing::debug!(
            closet = garments.len(),
            requested = max_results,
            produced = suggestions.len(),
            dress_code = %options.dress_code,
            "Outfit suggestions generated"
        );

        suggestions
    }

    /// Same as [`suggest`](Self::suggest), also returning the derived target
    pub fn suggest_with_target<'a, R: Rng>(
        &self,
        garments: &'a [Garment],
        weather: &Weather,
        options: &SuggestOptions,
        max_results: usize,
        rng: &mut R,
    ) -> (WeatherTarget, Vec<OutfitSuggestion<'a>>) {
        (
            derive_target(weather),
            self.suggest(garments, weather, options, max_results, rng),
        )
    }

    fn suggest_from_pools<'a, R: Rng>(
        &self,
        pools: &CandidatePools<'a>,
        max_results: usize,
        rng: &mut R,
    ) -> Vec<OutfitSuggestion<'a>> {
        if max_results == 0 || !pools.can_dress() {
            return Vec::new();
        }

        let mut suggestions: Vec<OutfitSuggestion<'a>> = Vec::new();
        let mut used_tops = HashSet::new();
        let mut used_bottoms = HashSet::new();
        let mut used_shoes = HashSet::new();
        let mut used_outers = HashSet::new();

        // Diversified rounds: every pick consumes its items for later rounds
        while suggestions.len() < max_results {
            let tops = unused(&pools.tops, &used_tops, self.limits.slot_cap);
            let bottoms = unused(&pools.bottoms, &used_bottoms, self.limits.slot_cap);
            let shoes = unused(&pools.shoes, &used_shoes, self.limits.slot_cap);
            let outers = match &pools.outerwear {
                None => vec![None],
                Some(outerwear) => unused(outerwear, &used_outers, self.limits.outerwear_cap)
                    .into_iter()
                    .map(Some)
                    .collect(),
            };

            let candidates = combinations(&tops, &bottoms, &shoes, &outers);
            let Some(best) = self.rank(candidates, rng).into_iter().next() else {
                break;
            };

            used_tops.insert(best.top.id);
            used_bottoms.insert(best.bottom.id);
            used_shoes.insert(best.shoe.id);
            if let Some(outer) = best.outerwear {
                used_outers.insert(outer.id);
            }
            suggestions.push(best);
        }

        if suggestions.len() < max_results {
            let outers: Vec<Option<&'a Garment>> = match &pools.outerwear {
                None => vec![None],
                Some(outerwear) => outerwear.iter().copied().map(Some).collect(),
            };
            let candidates = combinations(&pools.tops, &pools.bottoms, &pools.shoes, &outers);
            let diversified = suggestions.len();

            for candidate in self.rank(candidates, rng) {
                if suggestions.len() >= max_results {
                    break;
                }
                if !suggestions.iter().any(|s| s.key() == candidate.key()) {
                    suggestions.push(candidate);
                }
            }

            tracing::debug!(
                diversified,
                topped_up = suggestions.len() - diversified,
                "Filled remaining suggestions from full candidate set"
            );
        }

        suggestions
    }

    /// Highest score first; equal scores keep generation order
    fn rank<'a, R: Rng>(
        &self,
        candidates: Vec<OutfitSuggestion<'a>>,
        rng: &mut R,
    ) -> Vec<OutfitSuggestion<'a>> {
        let mut scored: Vec<(f64, OutfitSuggestion<'a>)> = candidates
            .into_iter()
            .map(|outfit| {
                let score = f64::from(score_outfit(&outfit.items()).total()) + self.jitter(rng);
                (score, outfit)
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().map(|(_, outfit)| outfit).collect()
    }

    fn jitter<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.limits.jitter.is_finite() && self.limits.jitter > 0.0 {
            rng.random_range(0.0..self.limits.jitter)
        } else {
            0.0
        }
    }
}

/// Suggests outfits with the default tunables and a thread-local rng
pub fn suggest_outfits<'a>(
    garments: &'a [Garment],
    weather: &Weather,
    options: &SuggestOptions,
    max_results: usize,
) -> Vec<OutfitSuggestion<'a>> {
    OutfitEngine::default().suggest(garments, weather, options, max_results, &mut rand::rng())
}

fn unused<'a>(pool: &[&'a Garment], used: &HashSet<Uuid>, cap: usize) -> Vec<&'a Garment> {
    pool.iter()
        .copied()
        .filter(|g| !used.contains(&g.id))
        .take(cap)
        .collect()
}

fn combinations<'a>(
    tops: &[&'a Garment],
    bottoms: &[&'a Garment],
    shoes: &[&'a Garment],
    outers: &[Option<&'a Garment>],
) -> Vec<OutfitSuggestion<'a>> {
    let mut outfits = Vec::with_capacity(tops.len() * bottoms.len() * shoes.len() * outers.len());
    for &top in tops {
        for &bottom in bottoms {
            for &shoe in shoes {
                for &outerwear in outers {
                    outfits.push(OutfitSuggestion {
                        top,
                        bottom,
                        outerwear,
                        shoe,
                    });
                }
            }
        }
    }
    outfits
}
