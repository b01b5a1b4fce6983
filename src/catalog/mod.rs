// 带缓存的目录查询
// 每种资源流程相同：算键 -> 查缓存 -> 未命中回源 -> 有数据则按资源 TTL 写回

mod resource;

use std::sync::Arc;

use serde_json::Value;

use crate::cache::{CacheLookup, ResponseCache};
use crate::upstream::Upstream;
use crate::utils::is_truthy;

pub use resource::{DEFAULT_LIMIT, Resource};

/// 目录服务，进程内共享一个实例
///
/// 不做请求合并：同一个键的并发未命中会各自回源、各自覆盖缓存。
#[derive(Clone)]
pub struct Catalog {
    cache: ResponseCache,
    upstream: Arc<dyn Upstream>,
}

impl Catalog {
    pub fn new(cache: ResponseCache, upstream: Arc<dyn Upstream>) -> Self {
        Self { cache, upstream }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// 查询资源；上游任何失败都返回 None
    pub async fn fetch(&self, resource: Resource) -> Option<Value> {
        let key = resource.cache_key();
        if let CacheLookup::Hit(value) = self.cache.get(&key).await {
            return Some(value);
        }

        // 回源放到独立任务里，请求被取消时仍会完成并写入缓存
        let this = self.clone();
        let task = tokio::spawn(async move { this.fetch_and_store(resource, key).await });
        match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Upstream fetch task failed: {}", e);
                None
            }
        }
    }

    async fn fetch_and_store(&self, resource: Resource, key: String) -> Option<Value> {
        let path = resource.path();
        match self.upstream.get_json(&path, &resource.query()).await {
            Ok(value) => {
                if is_truthy(&value) {
                    self.cache.set(&key, &value, Some(resource.ttl())).await;
                }
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Upstream request {} failed: {}", path, e);
                None
            }
        }
    }

    pub async fn new_movies(&self, page: u32) -> Option<Value> {
        self.fetch(Resource::NewMovies { page }).await
    }

    pub async fn movies(&self, page: u32, limit: u32) -> Option<Value> {
        self.fetch(Resource::Movies { page, limit }).await
    }

    pub async fn series(&self, page: u32, limit: u32) -> Option<Value> {
        self.fetch(Resource::Series { page, limit }).await
    }

    pub async fn tv_shows(&self, page: u32, limit: u32) -> Option<Value> {
        self.fetch(Resource::TvShows { page, limit }).await
    }

    pub async fn anime(&self, page: u32, limit: u32) -> Option<Value> {
        self.fetch(Resource::Anime { page, limit }).await
    }

    pub async fn movie_detail(&self, slug: &str) -> Option<Value> {
        self.fetch(Resource::Detail {
            slug: slug.to_string(),
        })
        .await
    }

    pub async fn search(&self, keyword: &str, page: u32, limit: u32) -> Option<Value> {
        self.fetch(Resource::Search {
            keyword: keyword.to_string(),
            page,
            limit,
        })
        .await
    }

    pub async fn by_category(&self, slug: &str, page: u32, limit: u32) -> Option<Value> {
        self.fetch(Resource::Category {
            slug: slug.to_string(),
            page,
            limit,
        })
        .await
    }

    pub async fn by_country(&self, slug: &str, page: u32, limit: u32) -> Option<Value> {
        self.fetch(Resource::Country {
            slug: slug.to_string(),
            page,
            limit,
        })
        .await
    }

    pub async fn by_year(&self, year: i32, page: u32, limit: u32) -> Option<Value> {
        self.fetch(Resource::Year { year, page, limit }).await
    }

    pub async fn categories(&self) -> Option<Value> {
        self.fetch(Resource::Categories).await
    }

    pub async fn countries(&self) -> Option<Value> {
        self.fetch(Resource::Countries).await
    }
}
