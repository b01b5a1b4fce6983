// 响应缓存
// 位于上游调用之前：按确定的键读取，未命中时由调用方回源并写回

pub mod keys;
mod memory;
mod pattern;
mod redis_store;
mod store;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::utils::is_truthy;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{CacheError, CacheStore, NoopStore};

/// 读缓存的结果；任何读取失败都视为未命中
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Value),
    Miss,
}

/// 写缓存的结果，写入是尽力而为的
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    Stored,
    /// 缓存关闭
    Skipped,
    Failed,
}

/// 删除的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheRemoval {
    Removed(u64),
    Failed,
}

/// 响应缓存，对调用方从不返回错误
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// 不做任何缓存的实例
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopStore), Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }

    pub async fn get(&self, key: &str) -> CacheLookup {
        if !self.store.is_enabled() {
            return CacheLookup::Miss;
        }

        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                tracing::warn!("Cache get error for {}: {}", key, e);
                return CacheLookup::Miss;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) if is_truthy(&value) => {
                tracing::debug!("Cache hit: {}", key);
                CacheLookup::Hit(value)
            }
            Ok(_) => CacheLookup::Miss,
            Err(e) => {
                tracing::warn!("Cache get error for {}: {}", key, CacheError::from(e));
                CacheLookup::Miss
            }
        }
    }

    /// 写入缓存，`ttl` 为空时使用默认过期时间
    pub async fn set(&self, key: &str, value: &Value, ttl: Option<Duration>) -> CacheWrite {
        if !self.store.is_enabled() {
            return CacheWrite::Skipped;
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Cache set error for {}: {}", key, e);
                return CacheWrite::Failed;
            }
        };

        match self.store.set(key, json, ttl).await {
            Ok(()) => {
                tracing::debug!("Cache set: {} (ttl {}s)", key, ttl.as_secs());
                CacheWrite::Stored
            }
            Err(e) => {
                tracing::warn!("Cache set error for {}: {}", key, e);
                CacheWrite::Failed
            }
        }
    }

    pub async fn delete(&self, key: &str) -> CacheRemoval {
        if !self.store.is_enabled() {
            return CacheRemoval::Removed(0);
        }

        match self.store.delete(key).await {
            Ok(removed) => CacheRemoval::Removed(removed),
            Err(e) => {
                tracing::warn!("Cache delete error for {}: {}", key, e);
                CacheRemoval::Failed
            }
        }
    }

    /// 删除所有匹配 glob 模式的键
    pub async fn clear_pattern(&self, pattern: &str) -> CacheRemoval {
        if !self.store.is_enabled() {
            return CacheRemoval::Removed(0);
        }

        match self.store.clear_pattern(pattern).await {
            Ok(removed) => {
                tracing::info!("Cache cleared {} keys matching {}", removed, pattern);
                CacheRemoval::Removed(removed)
            }
            Err(e) => {
                tracing::warn!("Cache clear pattern error for {}: {}", pattern, e);
                CacheRemoval::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// 模拟不可用的存储
    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(io_error())
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(io_error())
        }

        async fn delete(&self, _key: &str) -> Result<u64, CacheError> {
            Err(io_error())
        }

        async fn clear_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
            Err(io_error())
        }
    }

    fn io_error() -> CacheError {
        CacheError::Unavailable(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        )))
    }

    fn memory_cache() -> (Arc<MemoryStore>, ResponseCache) {
        let store = Arc::new(MemoryStore::new());
        let cache = ResponseCache::new(store.clone(), Duration::from_secs(3600));
        (store, cache)
    }

    #[tokio::test]
    async fn set_then_get_returns_payload() {
        let (_, cache) = memory_cache();
        let payload = json!({"status": "success", "items": [{"slug": "a"}]});

        assert_eq!(cache.set("k", &payload, None).await, CacheWrite::Stored);
        assert_eq!(cache.get("k").await, CacheLookup::Hit(payload));
    }

    #[tokio::test]
    async fn default_ttl_applies_when_unspecified() {
        let (store, cache) = memory_cache();
        cache.set("k", &json!({"a": 1}), None).await;
        cache.set("short", &json!({"a": 1}), Some(Duration::from_secs(300))).await;

        let ttl = store.ttl("k").await.unwrap();
        assert!(ttl > Duration::from_secs(3590) && ttl <= Duration::from_secs(3600));
        assert!(store.ttl("short").await.unwrap() <= Duration::from_secs(300));
    }

    #[tokio::test]
    async fn malformed_value_reads_as_miss() {
        let (store, cache) = memory_cache();
        store
            .set("k", "{not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn falsy_value_reads_as_miss() {
        let (_, cache) = memory_cache();
        cache.set("empty", &json!({}), None).await;
        assert_eq!(cache.get("empty").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn unavailable_store_degrades_silently() {
        let cache = ResponseCache::new(Arc::new(BrokenStore), Duration::from_secs(60));
        assert_eq!(cache.get("k").await, CacheLookup::Miss);
        assert_eq!(cache.set("k", &json!({"a": 1}), None).await, CacheWrite::Failed);
        assert_eq!(cache.delete("k").await, CacheRemoval::Failed);
        assert_eq!(cache.clear_pattern("*").await, CacheRemoval::Failed);
    }

    #[tokio::test]
    async fn disabled_cache_always_misses() {
        let cache = ResponseCache::disabled();
        assert!(!cache.is_enabled());
        assert_eq!(cache.set("k", &json!({"a": 1}), None).await, CacheWrite::Skipped);
        assert_eq!(cache.get("k").await, CacheLookup::Miss);
        assert_eq!(cache.delete("k").await, CacheRemoval::Removed(0));
    }

    #[tokio::test]
    async fn clear_pattern_then_reads_miss() {
        let (_, cache) = memory_cache();
        cache.set("movies:page:1", &json!({"p": 1}), None).await;
        cache.set("movies:page:2", &json!({"p": 2}), None).await;

        assert_eq!(cache.clear_pattern("movies:*").await, CacheRemoval::Removed(2));
        assert_eq!(cache.get("movies:page:1").await, CacheLookup::Miss);
        assert_eq!(cache.get("movies:page:2").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_, cache) = memory_cache();
        cache.set("k", &json!({"a": 1}), None).await;
        assert_eq!(cache.delete("k").await, CacheRemoval::Removed(1));
        assert_eq!(cache.delete("k").await, CacheRemoval::Removed(0));
    }
}
