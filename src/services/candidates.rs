use chrono::{DateTime, Utc};

use crate::models::{DressCode, Garment, GarmentKind, WeatherTarget};

/// Warmth distance tolerated for tops and bottoms (layering leaves room)
pub const LAYER_WARMTH_TOLERANCE: u8 = 2;

/// Warmth distance tolerated for outerwear
pub const OUTER_WARMTH_TOLERANCE: u8 = 1;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Constraints a garment must meet before it is considered for any slot
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter {
    pub dress_code: DressCode,
    pub days_no_repeat: u32,
    pub now: DateTime<Utc>,
}

/// Per-slot candidates, least-worn first, borrowing from the closet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePools<'a> {
    pub tops: Vec<&'a Garment>,
    pub bottoms: Vec<&'a Garment>,
    pub shoes: Vec<&'a Garment>,
    /// `None` when the weather doesn't call for outerwear at all
    pub outerwear: Option<Vec<&'a Garment>>,
}

impl<'a> CandidatePools<'a> {
    /// Whether at least one complete outfit can be assembled
    pub fn can_dress(&self) -> bool {
        !self.tops.is_empty()
            && !self.bottoms.is_empty()
            && !self.shoes.is_empty()
            && self.outerwear.as_ref().map_or(true, |outer| !outer.is_empty())
    }
}

impl CandidateFilter {
    /// Builds the per-slot candidate pools for one request.
    ///
    /// Order: dirty items go first, then off-dress-code items, then
    /// anything worn inside the no-repeat window. When waterproofing is
    /// required only outerwear and shoes must be water resistant.
    pub fn build_pools<'a>(&self, garments: &'a [Garment], target: &WeatherTarget) -> CandidatePools<'a> {
        let pool: Vec<&'a Garment> = garments
            .iter()
            .filter(|g| !g.is_dirty)
            .filter(|g| g.suits(self.dress_code))
            .filter(|g| self.rested(g))
            .filter(|g| !target.need_waterproof || weatherproof_enough(g))
            .collect();

        let pools = CandidatePools {
            tops: select_slot(&pool, GarmentKind::Top, Some((target.top_warmth, LAYER_WARMTH_TOLERANCE))),
            bottoms: select_slot(
                &pool,
                GarmentKind::Bottom,
                Some((target.bottom_warmth, LAYER_WARMTH_TOLERANCE)),
            ),
            // Shoes are weather-insensitive: no warmth window
            shoes: select_slot(&pool, GarmentKind::Shoe, None),
            outerwear: target.outer_required.then(|| {
                select_slot(
                    &pool,
                    GarmentKind::Outerwear,
                    Some((target.outer_warmth, OUTER_WARMTH_TOLERANCE)),
                )
            }),
        };

        tracing::debug!(
            dress_code = %self.dress_code,
            eligible = pool.len(),
            tops = pools.tops.len(),
            bottoms = pools.bottoms.len(),
            shoes = pools.shoes.len(),
            outerwear = ?pools.outerwear.as_ref().map(Vec::len),
            "Candidate pools built"
        );

        pools
    }

    /// Never-worn garments are always rested
    fn rested(&self, garment: &Garment) -> bool {
        match garment.last_worn_at {
            None => true,
            Some(worn_at) => {
                let elapsed_days = (self.now - worn_at).num_milliseconds() as f64 / MILLIS_PER_DAY;
                elapsed_days >= f64::from(self.days_no_repeat)
            }
        }
    }
}

fn weatherproof_enough(garment: &Garment) -> bool {
    match garment.kind {
        GarmentKind::Outerwear | GarmentKind::Shoe => garment.water_resistant,
        _ => true,
    }
}

fn select_slot<'a>(pool: &[&'a Garment], kind: GarmentKind, warmth_window: Option<(u8, u8)>) -> Vec<&'a Garment> {
    let mut slot: Vec<&'a Garment> = pool
        .iter()
        .copied()
        .filter(|g| g.kind == kind)
        .filter(|g| match warmth_window {
            Some((target, tolerance)) => g.warmth.abs_diff(target) <= tolerance,
            None => true,
        })
        .collect();

    // Stable: equal wear counts keep closet order
    slot.sort_by_key(|g| g.times_worn);
    slot
}
