/// Serves `$fetch` through the Redis cache.
///
/// Looks `$key` up first; on a miss awaits `$fetch`, queues the value with
/// `$ttl` seconds to live and returns it. A failed lookup is logged and
/// treated as a miss, so an unavailable cache never hides a reachable
/// source. Fetch errors are propagated with `?`, so the caller must return
/// `AppResult`.
///
/// ```rust,ignore
/// cached!(self.cache, CacheKey::weather(lat, lon), self.cache_ttl, async move {
///     self.call_api(lat, lon).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        let key = $key;
        match $cache.get(&key).await {
            Ok(Some(hit)) => Ok(hit),
            lookup => {
                if let Err(e) = lookup {
                    ::tracing::warn!(error = %e, key = %key, "Cache read failed, fetching fresh value");
                }
                let fresh = $fetch.await?;
                $cache.put(&key, &fresh, $ttl);
                Ok(fresh)
            }
        }
    }};
}
