//! Cache backend with a local (DashMap) tier and an optional Redis tier.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;

/// A cached entry with TTL support.
///
/// The data is wrapped in `Arc` so cache hits clone a pointer, not the
/// payload.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    /// Create a new cached entry.
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

#[derive(Clone)]
enum CacheTier {
    /// Single-instance: local DashMap only
    Local(Arc<DashMap<String, CachedEntry>>),

    /// Redis behind a local L1
    Redis {
        redis: Pool,
        local: Arc<DashMap<String, CachedEntry>>,
    },
}

/// Key/value cache with expiration.
///
/// Writes go to every tier and are awaited, so a read issued after a
/// completed `set`/`invalidate` observes it. Redis failures degrade to the
/// local tier; they are logged and never propagated.
#[derive(Clone)]
pub struct CacheBackend {
    tier: CacheTier,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheBackend {
    /// Create a new local-only cache backend.
    pub fn new_local() -> Self {
        Self {
            tier: CacheTier::Local(Arc::new(DashMap::new())),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a new Redis-backed cache backend.
    pub fn new_redis(redis_pool: Pool) -> Self {
        Self {
            tier: CacheTier::Redis {
                redis: redis_pool,
                local: Arc::new(DashMap::new()),
            },
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get a value from the cache.
    ///
    /// Checks L1 first, then Redis; a value found only in Redis is promoted
    /// to L1. Any Redis error is treated as a miss.
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        let result = self.lookup(key).await;
        if result.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    async fn lookup(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        let local = match &self.tier {
            CacheTier::Local(map) => map,
            CacheTier::Redis { local, .. } => local,
        };

        if let Some(entry) = local.get(key) {
            if !entry.is_expired() {
                tracing::debug!(key = %key, "cache hit (L1)");
                return Some(Arc::clone(&entry.data));
            }
            drop(entry);
            local.remove(key);
        }

        let CacheTier::Redis { redis, local } = &self.tier else {
            return None;
        };

        match redis.get().await {
            Ok(mut conn) => match conn.get::<_, Option<Vec<u8>>>(key).await {
                Ok(Some(data)) => {
                    tracing::debug!(key = %key, "cache hit (L2)");
                    let entry = CachedEntry::new(data, Duration::from_secs(3600));
                    let data_arc = Arc::clone(&entry.data);
                    local.insert(key.to_string(), entry);
                    Some(data_arc)
                }
                Ok(None) => {
                    tracing::debug!(key = %key, "cache miss");
                    None
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Redis GET error");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get Redis connection");
                None
            }
        }
    }

    /// Set a value in the cache with a TTL.
    ///
    /// Errors on the Redis write are logged and swallowed.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        match &self.tier {
            CacheTier::Local(map) => {
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
            }
            CacheTier::Redis { redis, local } => {
                let entry = CachedEntry::new(value, ttl);
                let data_for_redis = Arc::clone(&entry.data);
                local.insert(key.to_string(), entry);

                match redis.get().await {
                    Ok(mut conn) => {
                        if let Err(e) = conn
                            .set_ex::<_, _, ()>(key, &*data_for_redis, ttl.as_secs())
                            .await
                        {
                            tracing::warn!(key = %key, error = %e, "Redis SET error");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Failed to get Redis connection");
                    }
                }
            }
        }
    }

    /// Invalidate a cache entry in every tier.
    ///
    /// Errors on the Redis delete are logged and swallowed.
    pub async fn invalidate(&self, key: &str) {
        match &self.tier {
            CacheTier::Local(map) => {
                map.remove(key);
                tracing::debug!(key = %key, "cache invalidated (local)");
            }
            CacheTier::Redis { redis, local } => {
                local.remove(key);

                match redis.get().await {
                    Ok(mut conn) => {
                        if let Err(e) = conn.del::<_, ()>(key).await {
                            tracing::warn!(key = %key, error = %e, "Redis DEL error");
                        } else {
                            tracing::debug!(key = %key, "cache invalidated (L1+L2)");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Failed to get Redis connection");
                    }
                }
            }
        }
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let (l1_entries, mode) = match &self.tier {
            CacheTier::Local(map) => (map.len(), "local"),
            CacheTier::Redis { local, .. } => (local.len(), "redis"),
        };
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            l1_entries,
            mode: mode.to_string(),
        }
    }

    /// Check if Redis is available (for health checks).
    pub async fn is_redis_available(&self) -> bool {
        match &self.tier {
            CacheTier::Local(_) => false,
            CacheTier::Redis { redis, .. } => redis.get().await.is_ok(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub l1_entries: usize,
    pub mode: String,
}
