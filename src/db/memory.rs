//! In-process closet, used by the test suite and for running without Postgres.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{distinct_wear_ids, GarmentStore},
    error::{AppError, AppResult},
    models::{Garment, GarmentUpdate, NewGarment, WearLog, WearMetadata},
};

#[derive(Default)]
struct Closet {
    garments: Vec<Garment>,
    wear_logs: Vec<WearLog>,
}

#[derive(Default)]
pub struct InMemoryGarmentStore {
    closet: RwLock<Closet>,
}

impl InMemoryGarmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with garments, e.g. ones carrying wear history
    pub fn with_garments(garments: Vec<Garment>) -> Self {
        Self {
            closet: RwLock::new(Closet {
                garments,
                wear_logs: Vec::new(),
            }),
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Garment {} not found", id))
}

#[async_trait::async_trait]
impl GarmentStore for InMemoryGarmentStore {
    async fn get_all_garments(&self) -> AppResult<Vec<Garment>> {
        let mut garments = self.closet.read().await.garments.clone();
        garments.sort_by_key(|g| g.times_worn);
        Ok(garments)
    }

    async fn get_garment(&self, id: Uuid) -> AppResult<Garment> {
        self.closet
            .read()
            .await
            .garments
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn add_garment(&self, garment: NewGarment) -> AppResult<Uuid> {
        garment.validate()?;
        let garment = garment.into_garment();
        let id = garment.id;

        let mut closet = self.closet.write().await;
        if closet.garments.iter().any(|g| g.id == id) {
            return Err(AppError::InvalidInput(format!("Garment {} already exists", id)));
        }
        closet.garments.push(garment);
        Ok(id)
    }

    async fn update_garment(&self, id: Uuid, update: GarmentUpdate) -> AppResult<Garment> {
        update.validate()?;

        let mut closet = self.closet.write().await;
        let garment = closet
            .garments
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| not_found(id))?;
        update.apply(garment);
        Ok(garment.clone())
    }

    async fn delete_garment(&self, id: Uuid) -> AppResult<()> {
        let mut closet = self.closet.write().await;
        let before = closet.garments.len();
        closet.garments.retain(|g| g.id != id);
        if closet.garments.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn log_wear(&self, garment_ids: &[Uuid], metadata: WearMetadata) -> AppResult<WearLog> {
        let ids = distinct_wear_ids(garment_ids)?;
        let mut closet = self.closet.write().await;

        if let Some(missing) = ids
            .iter()
            .find(|id| !closet.garments.iter().any(|g| g.id == **id))
        {
            return Err(not_found(*missing));
        }

        let worn_at = Utc::now();
        for garment in closet.garments.iter_mut().filter(|g| ids.contains(&g.id)) {
            garment.record_wear(worn_at);
        }

        let log = WearLog::new(ids, worn_at, metadata);
        closet.wear_logs.push(log.clone());
        Ok(log)
    }

    async fn wear_logs(&self, limit: usize) -> AppResult<Vec<WearLog>> {
        let closet = self.closet.read().await;
        let mut logs = closet.wear_logs.clone();
        // Reversed first so the stable sort keeps later inserts ahead on ties
        logs.reverse();
        logs.sort_by(|a, b| b.worn_at.cmp(&a.worn_at));
        logs.truncate(limit);
        Ok(logs)
    }

    async fn mark_clean(&self, garment_ids: &[Uuid]) -> AppResult<u64> {
        let mut closet = self.closet.write().await;
        let mut cleaned = 0;
        for garment in closet
            .garments
            .iter_mut()
            .filter(|g| g.is_dirty)
            .filter(|g| garment_ids.is_empty() || garment_ids.contains(&g.id))
        {
            garment.is_dirty = false;
            cleaned += 1;
        }
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DressCode, GarmentKind, Weather};
    use tokio_test::{assert_err, assert_ok};

    fn new_garment(kind: GarmentKind) -> NewGarment {
        NewGarment {
            id: None,
            kind,
            name: None,
            colors: vec!["black".to_string()],
            warmth: 2,
            water_resistant: false,
            dress_codes: vec![DressCode::Casual],
            image_uri: None,
            favorite: false,
        }
    }

    #[tokio::test]
    async fn test_add_and_get_garment() {
        let store = InMemoryGarmentStore::new();
        let id = assert_ok!(store.add_garment(new_garment(GarmentKind::Top)).await);

        let garment = assert_ok!(store.get_garment(id).await);
        assert_eq!(garment.kind, GarmentKind::Top);
        assert_eq!(garment.times_worn, 0);
        assert!(!garment.is_dirty);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_warmth() {
        let store = InMemoryGarmentStore::new();
        let mut garment = new_garment(GarmentKind::Top);
        garment.warmth = 6;

        let err = assert_err!(store.add_garment(garment).await);
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(store.get_all_garments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_id() {
        let store = InMemoryGarmentStore::new();
        let mut garment = new_garment(GarmentKind::Top);
        garment.id = Some(Uuid::new_v4());

        assert_ok!(store.add_garment(garment.clone()).await);
        assert_err!(store.add_garment(garment).await);
    }

    #[tokio::test]
    async fn test_get_all_orders_by_times_worn() {
        let mut worn = Garment::new(GarmentKind::Top, vec![], 2, vec![DressCode::Casual]);
        worn.times_worn = 7;
        let fresh = Garment::new(GarmentKind::Bottom, vec![], 2, vec![DressCode::Casual]);
        let store = InMemoryGarmentStore::with_garments(vec![worn.clone(), fresh.clone()]);

        let all = store.get_all_garments().await.unwrap();
        assert_eq!(all[0].id, fresh.id);
        assert_eq!(all[1].id, worn.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = InMemoryGarmentStore::new();
        let id = store.add_garment(new_garment(GarmentKind::Top)).await.unwrap();

        let update = GarmentUpdate {
            favorite: Some(true),
            warmth: Some(4),
            ..Default::default()
        };
        let updated = assert_ok!(store.update_garment(id, update).await);
        assert!(updated.favorite);
        assert_eq!(updated.warmth, 4);

        assert_ok!(store.delete_garment(id).await);
        let err = assert_err!(store.get_garment(id).await);
        assert!(matches!(err, AppError::NotFound(_)));
        assert_err!(store.delete_garment(id).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_wear_logs_count_every_wear() {
        const WEARS: usize = 32;

        let store = std::sync::Arc::new(InMemoryGarmentStore::new());
        let mut ids = Vec::new();
        for kind in [GarmentKind::Top, GarmentKind::Bottom, GarmentKind::Shoe] {
            ids.push(store.add_garment(new_garment(kind)).await.unwrap());
        }

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..WEARS {
            let store = store.clone();
            let mut outfit = ids.clone();
            let len = outfit.len();
            outfit.rotate_left(i % len);
            tasks.spawn(async move { store.log_wear(&outfit, WearMetadata::default()).await });
        }
        while let Some(joined) = tasks.join_next().await {
            assert_ok!(joined.unwrap());
        }

        for id in &ids {
            let garment = store.get_garment(*id).await.unwrap();
            assert_eq!(garment.times_worn, WEARS as u32);
        }
        assert_eq!(store.wear_logs(usize::MAX).await.unwrap().len(), WEARS);
    }

    #[tokio::test]
    async fn test_log_wear_updates_garments_once_per_id() {
        let store = InMemoryGarmentStore::new();
        let top = store.add_garment(new_garment(GarmentKind::Top)).await.unwrap();
        let shoe = store.add_garment(new_garment(GarmentKind::Shoe)).await.unwrap();

        let metadata = WearMetadata {
            weather: Some(Weather::default()),
            dress_code: Some(DressCode::Casual),
        };
        let log = assert_ok!(store.log_wear(&[top, shoe, top], metadata).await);
        assert_eq!(log.garment_ids, vec![top, shoe]);
        assert_eq!(log.dress_code, Some(DressCode::Casual));

        let top = store.get_garment(top).await.unwrap();
        assert_eq!(top.times_worn, 1);
        assert!(top.is_dirty);
        assert_eq!(top.last_worn_at, Some(log.worn_at));

        let shoe = store.get_garment(shoe).await.unwrap();
        assert_eq!(shoe.times_worn, 1);
        assert!(!shoe.is_dirty);
    }

    #[tokio::test]
    async fn test_log_wear_unknown_id_changes_nothing() {
        let store = InMemoryGarmentStore::new();
        let top = store.add_garment(new_garment(GarmentKind::Top)).await.unwrap();

        let err = assert_err!(
            store
                .log_wear(&[top, Uuid::new_v4()], WearMetadata::default())
                .await
        );
        assert!(matches!(err, AppError::NotFound(_)));

        let top = store.get_garment(top).await.unwrap();
        assert_eq!(top.times_worn, 0);
        assert!(store.wear_logs(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_log_wear_rejects_empty_outfit() {
        let store = InMemoryGarmentStore::new();
        let err = assert_err!(store.log_wear(&[], WearMetadata::default()).await);
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_wear_logs_newest_first_with_limit() {
        let store = InMemoryGarmentStore::new();
        let top = store.add_garment(new_garment(GarmentKind::Top)).await.unwrap();

        let first = store.log_wear(&[top], WearMetadata::default()).await.unwrap();
        let second = store.log_wear(&[top], WearMetadata::default()).await.unwrap();

        let logs = store.wear_logs(10).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, second.id);
        assert_eq!(logs[1].id, first.id);

        assert_eq!(store.wear_logs(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_clean_selected_and_all() {
        let store = InMemoryGarmentStore::new();
        let a = store.add_garment(new_garment(GarmentKind::Top)).await.unwrap();
        let b = store.add_garment(new_garment(GarmentKind::Bottom)).await.unwrap();
        store.log_wear(&[a, b], WearMetadata::default()).await.unwrap();

        assert_eq!(store.mark_clean(&[a]).await.unwrap(), 1);
        assert!(!store.get_garment(a).await.unwrap().is_dirty);
        assert!(store.get_garment(b).await.unwrap().is_dirty);

        // Already clean garments don't count
        assert_eq!(store.mark_clean(&[a]).await.unwrap(), 0);
        assert_eq!(store.mark_clean(&[]).await.unwrap(), 1);
        assert!(!store.get_garment(b).await.unwrap().is_dirty);
    }
}
