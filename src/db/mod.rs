use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Garment, GarmentUpdate, NewGarment, WearLog, WearMetadata},
};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::InMemoryGarmentStore;
pub use postgres::{create_pool, run_migrations, PgGarmentStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};

/// Persistent closet storage
///
/// Every mutating call is atomic: it either applies completely or leaves
/// the closet untouched.
#[async_trait::async_trait]
pub trait GarmentStore: Send + Sync {
    /// All garments, least-worn first
    async fn get_all_garments(&self) -> AppResult<Vec<Garment>>;

    async fn get_garment(&self, id: Uuid) -> AppResult<Garment>;

    /// Validates and stores a new garment, returning its id
    async fn add_garment(&self, garment: NewGarment) -> AppResult<Uuid>;

    async fn update_garment(&self, id: Uuid, update: GarmentUpdate) -> AppResult<Garment>;

    async fn delete_garment(&self, id: Uuid) -> AppResult<()>;

    /// Records that the given garments were worn together just now.
    ///
    /// Each distinct id gets exactly one more wear. Fails with `NotFound`
    /// without touching anything if any id is unknown.
    async fn log_wear(&self, garment_ids: &[Uuid], metadata: WearMetadata) -> AppResult<WearLog>;

    /// Wear history, newest first
    async fn wear_logs(&self, limit: usize) -> AppResult<Vec<WearLog>>;

    /// Clears the dirty flag on the given garments, or on every dirty
    /// garment when `garment_ids` is empty. Returns how many changed.
    async fn mark_clean(&self, garment_ids: &[Uuid]) -> AppResult<u64>;
}

/// Distinct ids in first-seen order; rejects an empty outfit
pub(crate) fn distinct_wear_ids(garment_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
    if garment_ids.is_empty() {
        return Err(crate::error::AppError::InvalidInput(
            "A wear log needs at least one garment".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    Ok(garment_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_wear_ids_keeps_first_occurrence() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(distinct_wear_ids(&[a, b, a]).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_distinct_wear_ids_rejects_empty() {
        assert!(distinct_wear_ids(&[]).is_err());
    }
}
