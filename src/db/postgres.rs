use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::{distinct_wear_ids, GarmentStore},
    error::{AppError, AppResult},
    models::{
        garment::{DEFAULT_WARMTH, WARMTH_RANGE},
        DressCode, Garment, GarmentKind, GarmentUpdate, NewGarment, Weather, WearLog,
        WearMetadata,
    },
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const GARMENT_COLUMNS: &str = "id, kind, name, colors, warmth, water_resistant, dress_codes, \
     image_uri, last_worn_at, times_worn, is_dirty, favorite";

/// Raw garment row; older rows may carry NULLs in the counter and flag columns
#[derive(Debug, FromRow)]
struct GarmentRow {
    id: Uuid,
    kind: String,
    name: Option<String>,
    colors: Vec<String>,
    warmth: Option<i16>,
    water_resistant: bool,
    dress_codes: Vec<String>,
    image_uri: Option<String>,
    last_worn_at: Option<DateTime<Utc>>,
    times_worn: Option<i32>,
    is_dirty: Option<bool>,
    favorite: Option<bool>,
}

impl TryFrom<GarmentRow> for Garment {
    type Error = AppError;

    fn try_from(row: GarmentRow) -> AppResult<Self> {
        let kind: GarmentKind = row.kind.parse().map_err(|_| {
            AppError::Internal(format!("Garment {} has unknown type {:?}", row.id, row.kind))
        })?;

        let dress_codes = row
            .dress_codes
            .iter()
            .filter_map(|code| match code.parse::<DressCode>() {
                Ok(code) => Some(code),
                Err(_) => {
                    tracing::warn!(garment_id = %row.id, dress_code = %code, "Skipping unknown dress code");
                    None
                }
            })
            .collect();

        let warmth = row
            .warmth
            .map(|w| w.clamp(*WARMTH_RANGE.start() as i16, *WARMTH_RANGE.end() as i16) as u8)
            .unwrap_or(DEFAULT_WARMTH);

        Ok(Garment {
            id: row.id,
            kind,
            name: row.name,
            colors: row.colors,
            warmth,
            water_resistant: row.water_resistant,
            dress_codes,
            image_uri: row.image_uri,
            last_worn_at: row.last_worn_at,
            times_worn: row.times_worn.unwrap_or(0).max(0) as u32,
            is_dirty: row.is_dirty.unwrap_or(false),
            favorite: row.favorite.unwrap_or(false),
        })
    }
}

#[derive(Debug, FromRow)]
struct WearLogRow {
    id: Uuid,
    garment_ids: Vec<Uuid>,
    worn_at: DateTime<Utc>,
    weather: Option<Json<Weather>>,
    dress_code: Option<String>,
}

impl From<WearLogRow> for WearLog {
    fn from(row: WearLogRow) -> Self {
        WearLog {
            id: row.id,
            garment_ids: row.garment_ids,
            worn_at: row.worn_at,
            weather: row.weather.map(|Json(w)| w),
            dress_code: row.dress_code.and_then(|code| code.parse().ok()),
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Garment {} not found", id))
}

fn dress_code_strings(codes: &[DressCode]) -> Vec<String> {
    codes.iter().map(|c| c.as_str().to_string()).collect()
}

fn times_worn_column(times_worn: u32) -> i32 {
    i32::try_from(times_worn).unwrap_or(i32::MAX)
}

/// Closet storage backed by PostgreSQL
#[derive(Clone)]
pub struct PgGarmentStore {
    pool: PgPool,
}

impl PgGarmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GarmentStore for PgGarmentStore {
    async fn get_all_garments(&self) -> AppResult<Vec<Garment>> {
        let rows: Vec<GarmentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM garments ORDER BY COALESCE(times_worn, 0) ASC, created_at ASC",
            GARMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match Garment::try_from(row) {
                Ok(garment) => Some(garment),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable garment row");
                    None
                }
            })
            .collect())
    }

    async fn get_garment(&self, id: Uuid) -> AppResult<Garment> {
        let row: Option<GarmentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM garments WHERE id = $1",
            GARMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| not_found(id))?.try_into()
    }

    async fn add_garment(&self, garment: NewGarment) -> AppResult<Uuid> {
        garment.validate()?;
        let garment = garment.into_garment();

        let result = sqlx::query(
            r#"
            INSERT INTO garments
                (id, kind, name, colors, warmth, water_resistant, dress_codes,
                 image_uri, last_worn_at, times_worn, is_dirty, favorite)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(garment.id)
        .bind(garment.kind.as_str())
        .bind(&garment.name)
        .bind(&garment.colors)
        .bind(i16::from(garment.warmth))
        .bind(garment.water_resistant)
        .bind(dress_code_strings(&garment.dress_codes))
        .bind(&garment.image_uri)
        .bind(garment.last_worn_at)
        .bind(times_worn_column(garment.times_worn))
        .bind(garment.is_dirty)
        .bind(garment.favorite)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(garment_id = %garment.id, kind = %garment.kind, "Garment added");
                Ok(garment.id)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                AppError::InvalidInput(format!("Garment {} already exists", garment.id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_garment(&self, id: Uuid, update: GarmentUpdate) -> AppResult<Garment> {
        update.validate()?;

        let mut tx = self.pool.begin().await?;

        let row: Option<GarmentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM garments WHERE id = $1 FOR UPDATE",
            GARMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut garment: Garment = row.ok_or_else(|| not_found(id))?.try_into()?;
        update.apply(&mut garment);

        sqlx::query(
            r#"
            UPDATE garments
            SET name = $2, colors = $3, warmth = $4, water_resistant = $5,
                dress_codes = $6, image_uri = $7, is_dirty = $8, favorite = $9
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&garment.name)
        .bind(&garment.colors)
        .bind(i16::from(garment.warmth))
        .bind(garment.water_resistant)
        .bind(dress_code_strings(&garment.dress_codes))
        .bind(&garment.image_uri)
        .bind(garment.is_dirty)
        .bind(garment.favorite)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(garment)
    }

    async fn delete_garment(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM garments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn log_wear(&self, garment_ids: &[Uuid], metadata: WearMetadata) -> AppResult<WearLog> {
        let ids = distinct_wear_ids(garment_ids)?;
        let worn_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        let updated: Vec<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE garments
            SET times_worn = COALESCE(times_worn, 0) + 1,
                last_worn_at = $1,
                is_dirty = CASE WHEN kind = $3 THEN COALESCE(is_dirty, FALSE) ELSE TRUE END
            WHERE id = ANY($2)
            RETURNING id
            "#,
        )
        .bind(worn_at)
        .bind(&ids)
        .bind(GarmentKind::Shoe.as_str())
        .fetch_all(&mut *tx)
        .await?;

        if updated.len() != ids.len() {
            tx.rollback().await?;
            let missing = ids
                .iter()
                .find(|id| !updated.contains(id))
                .copied()
                .unwrap_or_default();
            return Err(not_found(missing));
        }

        let log = WearLog::new(ids, worn_at, metadata);

        sqlx::query(
            r#"
            INSERT INTO wear_logs (id, garment_ids, worn_at, weather, dress_code)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(log.id)
        .bind(&log.garment_ids)
        .bind(log.worn_at)
        .bind(log.weather.map(Json))
        .bind(log.dress_code.map(|code| code.as_str()))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            wear_log_id = %log.id,
            garments = log.garment_ids.len(),
            "Wear logged"
        );

        Ok(log)
    }

    async fn wear_logs(&self, limit: usize) -> AppResult<Vec<WearLog>> {
        let rows: Vec<WearLogRow> = sqlx::query_as(
            r#"
            SELECT id, garment_ids, worn_at, weather, dress_code
            FROM wear_logs
            ORDER BY worn_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WearLog::from).collect())
    }

    async fn mark_clean(&self, garment_ids: &[Uuid]) -> AppResult<u64> {
        let result = if garment_ids.is_empty() {
            sqlx::query("UPDATE garments SET is_dirty = FALSE WHERE is_dirty")
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query("UPDATE garments SET is_dirty = FALSE WHERE is_dirty AND id = ANY($1)")
                .bind(garment_ids)
                .execute(&self.pool)
                .await?
        };

        Ok(result.rows_affected())
    }
}
