use moka::future::Cache;
use redis::aio::ConnectionManager;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Shared Redis tier. Values are stored as JSON strings with `SETEX`.
struct RedisTier {
    conn: Mutex<ConnectionManager>,
    ttl_secs: u64,
}

impl RedisTier {
    async fn connect(url: &str, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl_secs,
        })
    }

    async fn fetch(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.lock().await;
        Ok(redis::cmd("GET").arg(key).query_async(&mut *conn).await?)
    }

    async fn store(&self, key: &str, json: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.lock().await;
        redis::cmd("DEL").arg(key).query_async::<()>(&mut *conn).await?;
        Ok(())
    }
}

/// Two-tier cache for catalogue-wide values.
///
/// L1 is an in-process moka cache. L2 is Redis, shared across instances,
/// and is optional: without it the manager behaves as a plain TTL cache.
pub struct CacheManager {
    l1: Cache<String, Arc<str>>,
    l2: Option<RedisTier>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let l2 = RedisTier::connect(redis_url, ttl_secs).await?;
        Ok(Self {
            l1: Self::build_l1(l1_size, ttl_secs),
            l2: Some(l2),
            ttl_secs,
        })
    }

    /// Create an in-process cache without a Redis tier
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            l1: Self::build_l1(l1_size, ttl_secs),
            l2: None,
            ttl_secs,
        }
    }

    fn build_l1(l1_size: u64, ttl_secs: u64) -> Cache<String, Arc<str>> {
        Cache::builder()
            .max_capacity(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build()
    }

    pub fn has_l2(&self) -> bool {
        self.l2.is_some()
    }

    /// Look a value up in L1, then L2. An L2 hit is copied into L1.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, CacheError> {
        if let Some(json) = self.l1.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_str(&json)?);
        }

        if let Some(l2) = &self.l2 {
            if let Some(json) = l2.fetch(key).await? {
                tracing::trace!("L2 cache hit: {}", key);
                let value = serde_json::from_str(&json)?;
                self.l1.insert(key.to_string(), Arc::from(json)).await;
                return Ok(value);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Write a value to every configured tier
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;

        if let Some(l2) = &self.l2 {
            l2.store(key, &json).await?;
        }
        self.l1.insert(key.to_string(), Arc::from(json)).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Drop a value from every configured tier
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1.invalidate(key).await;
        if let Some(l2) = &self.l2 {
            l2.remove(key).await?;
        }

        tracing::trace!("Cache delete: {}", key);
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1.entry_count(),
            l2_enabled: self.has_l2(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub l2_enabled: bool,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// The full recipe catalogue
    pub fn recipes() -> String {
        "recipes:all".to_string()
    }

    /// The ingredient dictionary titles
    pub fn ingredient_titles() -> String {
        "ingredients:titles".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get_with_redis() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = "test_key";
        let value = "test_value";

        cache.set(key, &value).await.unwrap();
        let result: String = cache.get(key).await.unwrap();
        assert_eq!(result, value);

        cache.delete(key).await.unwrap();
        assert!(cache.get::<String>(key).await.is_err());
    }

    #[tokio::test]
    async fn test_in_memory_set_get_delete() {
        let cache = CacheManager::in_memory(100, 60);
        assert!(!cache.has_l2());

        cache.set("k", &vec!["a".to_string(), "b".to_string()]).await.unwrap();
        let result: Vec<String> = cache.get("k").await.unwrap();
        assert_eq!(result, vec!["a", "b"]);

        cache.delete("k").await.unwrap();
        assert!(matches!(
            cache.get::<Vec<String>>("k").await,
            Err(CacheError::CacheMiss(_))
        ));
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::recipes(), "recipes:all");
        assert_eq!(CacheKey::ingredient_titles(), "ingredients:titles");
    }
}
