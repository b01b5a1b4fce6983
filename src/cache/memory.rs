use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::pattern::glob_match;
use super::store::{CacheError, CacheStore};

// 默认最多保存的条目数
const DEFAULT_CAPACITY: u64 = 10_000;

// 超过一年的 TTL 按一年处理
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
    inserted: Instant,
}

/// 每个条目按写入时给定的 TTL 过期，覆盖写入重新计时
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// 进程内缓存存储，容量有上限，过期条目由后台维护清除
pub struct MemoryStore {
    cache: Cache<String, Entry>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .name("response-cache")
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }

    /// 当前存活的条目数，先执行挂起的清理
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 条目剩余存活时间
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let entry = self.cache.get(key).await?;
        entry.ttl.checked_sub(entry.inserted.elapsed())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            ttl: ttl.min(MAX_TTL),
            inserted: Instant::now(),
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        Ok(u64::from(self.cache.remove(key).await.is_some()))
    }

    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        // iter 不返回已过期的条目，计数与 Redis 一致
        let matching: Vec<_> = self
            .cache
            .iter()
            .filter(|(key, _)| glob_match(pattern, key))
            .map(|(key, _)| key)
            .collect();

        let mut removed = 0;
        for key in matching {
            if self.cache.remove(key.as_str()).await.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
