use std::sync::Arc;

use cache::{CacheStore, MemoryStore, NoopStore, RedisStore, ResponseCache};
use catalog::Catalog;
use config::{CacheBackend, Config};
use upstream::{HttpUpstream, UpstreamError};

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod upstream;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    /// 按配置创建缓存和上游客户端
    pub fn from_config(config: Config) -> Result<Self, UpstreamError> {
        let cache = ResponseCache::new(cache_store(&config), config.cache_ttl());
        let upstream = HttpUpstream::new(config.upstream_base_url.clone(), config.upstream_timeout())?;
        let catalog = Catalog::new(cache, Arc::new(upstream));
        Ok(Self::new(config, catalog))
    }
}

// 缓存不可用时退化为不缓存，服务照常工作
fn cache_store(config: &Config) -> Arc<dyn CacheStore> {
    if !config.cache_enabled {
        tracing::info!("Response cache disabled");
        return Arc::new(NoopStore);
    }

    match config.cache_backend {
        CacheBackend::Memory => {
            tracing::info!("Using in-process response cache");
            Arc::new(MemoryStore::with_capacity(config.cache_max_entries))
        }
        CacheBackend::Redis => match RedisStore::open(&config.redis_url, config.redis_timeout()) {
            Ok(store) => {
                tracing::info!("Using Redis response cache at {}", config.redis_url);
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!("Invalid Redis URL, caching disabled: {}", e);
                Arc::new(NoopStore)
            }
        },
    }
}
