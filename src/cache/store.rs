use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(#[from] redis::RedisError),
    #[error("cache store did not answer within {0:?}")]
    Timeout(Duration),
    #[error("malformed cached value: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 缓存存储后端
///
/// 值以序列化后的 JSON 字符串保存，过期由存储自身负责。
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// 读取未过期的值
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// 写入并设置过期时间，同名键直接覆盖
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// 删除单个键，返回删除数量
    async fn delete(&self, key: &str) -> Result<u64, CacheError>;

    /// 按 glob 模式批量删除，返回删除数量
    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// 禁用缓存时为 false，此时读写都直接跳过
    fn is_enabled(&self) -> bool {
        true
    }
}

/// 缓存关闭时使用：永远未命中
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

#[async_trait]
impl CacheStore for NoopStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<u64, CacheError> {
        Ok(0)
    }

    async fn clear_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
        Ok(0)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
