use redis::AsyncCommands;
use redis::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Weather reading for coordinates already rounded by [`CacheKey::weather`]
    Weather(String),
}

impl CacheKey {
    /// Weather key with coordinates rounded to two decimals (~1 km), so
    /// nearby requests share one reading
    pub fn weather(latitude: f64, longitude: f64) -> Self {
        CacheKey::Weather(format!("{:.2},{:.2}", latitude, longitude))
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Weather(coords) => write!(f, "weather:{}", coords),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

struct PendingWrite {
    key: String,
    json: String,
    ttl: u64,
}

/// Read-through JSON cache on Redis.
///
/// Reads hit Redis directly. Writes are queued and flushed by a background
/// task in pipelined batches, so a request never waits on a cache write.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the background writer; pending writes are flushed first
pub struct CacheWriterHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Spawns the writer task; must be called inside a Tokio runtime
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (writes, queue) = mpsc::unbounded_channel();
        let (stop, stopped) = oneshot::channel();

        let task = tokio::spawn(run_writer(redis_client.clone(), queue, stopped));

        (
            Self {
                redis_client,
                writes,
            },
            CacheWriterHandle { stop, task },
        )
    }

    /// Cached value for `key`, `None` on a miss
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        let Some(json) = cached else {
            tracing::debug!(key = %key, "Cache miss");
            return Ok(None);
        };

        tracing::debug!(key = %key, "Cache hit");
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| AppError::Internal(format!("Cache deserialization error: {}", e)))
    }

    /// Queues `value` under `key` for `ttl` seconds without waiting on Redis
    pub fn put<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            json,
            ttl,
        };
        if self.writes.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}

async fn run_writer(
    client: Client,
    mut queue: mpsc::UnboundedReceiver<PendingWrite>,
    mut stopped: oneshot::Receiver<()>,
) {
    tracing::info!("Cache writer started");

    // A dropped handle means nobody will ask for shutdown; keep serving until
    // every Cache clone is gone
    let mut listening = true;
    loop {
        tokio::select! {
            biased;
            signal = &mut stopped, if listening => match signal {
                Ok(()) => break,
                Err(_) => listening = false,
            },
            next = queue.recv() => match next {
                Some(first) => {
                    let mut batch = vec![first];
                    while let Ok(write) = queue.try_recv() {
                        batch.push(write);
                    }
                    flush(&client, batch).await;
                }
                None => return,
            },
        }
    }

    // Closing lets recv() end once the backlog is drained
    queue.close();
    let mut backlog = Vec::new();
    while let Some(write) = queue.recv().await {
        backlog.push(write);
    }
    if !backlog.is_empty() {
        tracing::info!(pending = backlog.len(), "Flushing cache writes before shutdown");
        flush(&client, backlog).await;
    }

    tracing::info!("Cache writer stopped");
}

async fn flush(client: &Client, batch: Vec<PendingWrite>) {
    let count = batch.len();
    if let Err(e) = write_batch(client, batch).await {
        tracing::error!(error = %e, count, "Failed to write to Redis cache");
    }
}

async fn write_batch(client: &Client, batch: Vec<PendingWrite>) -> redis::RedisResult<()> {
    let mut pipe = redis::pipe();
    for write in batch {
        pipe.set_ex(write.key, write.json, write.ttl).ignore();
    }

    let mut conn = client.get_multiplexed_async_connection().await?;
    let _: () = pipe.query_async(&mut conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weather;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[test]
    fn test_cache_key_display_weather() {
        let key = CacheKey::weather(52.52, 13.404);
        assert_eq!(key.to_string(), "weather:52.52,13.40");
    }

    #[test]
    fn test_cache_key_nearby_coordinates_share_key() {
        assert_eq!(
            CacheKey::weather(48.85661, 2.35222),
            CacheKey::weather(48.8570, 2.3518)
        );
        assert_ne!(CacheKey::weather(48.85, 2.35), CacheKey::weather(-48.85, 2.35));
    }

    #[tokio::test]
    async fn test_shutdown_without_writes_completes() {
        // No write is queued, so Redis is never contacted
        let client = create_redis_client("redis://localhost:6379").unwrap();
        let (_cache, handle) = Cache::new(client).await;
        handle.shutdown().await;
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_cache_miss() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client).await;

        let key = CacheKey::Weather("nowhere".to_string());
        let cached: Option<Weather> = cache.get(&key).await.unwrap();
        assert_eq!(cached, None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_put_is_flushed_on_shutdown() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client.clone()).await;

        let key = CacheKey::weather(9.87, 6.54);
        let reading = Weather {
            temp_c: -3.0,
            chance_of_rain: 0.9,
            wind_kph: 31.0,
            is_snow: true,
        };

        cache.put(&key, &reading, 60);
        handle.shutdown().await;

        let cached: Option<Weather> = cache.get(&key).await.unwrap();
        assert_eq!(cached, Some(reading));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
