use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client as RedisClient};
use tokio::sync::OnceCell;

use super::store::{CacheError, CacheStore};

// SCAN 每批返回的建议数量
const SCAN_BATCH: usize = 200;
// 连接断开后的重连次数
const RECONNECT_RETRIES: usize = 2;

/// 基于 Redis 的缓存存储
///
/// 所有操作共用一个 `ConnectionManager`，首次使用时建立，断线后自动重连。
/// 每次操作（含建连）都受 `timeout` 限制，Redis 无响应时按失败返回。
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
    conn: Arc<OnceCell<ConnectionManager>>,
    timeout: Duration,
}

impl RedisStore {
    pub fn open(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = RedisClient::open(url)?;
        Ok(Self {
            client,
            conn: Arc::new(OnceCell::new()),
            timeout,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| {
                let config = ConnectionManagerConfig::new()
                    .set_connection_timeout(self.timeout)
                    .set_response_timeout(self.timeout)
                    .set_number_of_retries(RECONNECT_RETRIES);
                ConnectionManager::new_with_config(self.client.clone(), config)
            })
            .await?;
        Ok(conn.clone())
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| CacheError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let value: Option<String> = conn.get(key).await?;
            Ok::<_, CacheError>(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            // SETEX 不接受 0 秒
            let seconds = ttl.as_secs().max(1);
            let _: () = conn.set_ex(key, value, seconds).await?;
            Ok::<_, CacheError>(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let removed: u64 = conn.del(key).await?;
            Ok::<_, CacheError>(removed)
        })
        .await
    }

    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut conn = self.bounded(self.connection()).await?;

        // 用 SCAN 代替 KEYS，避免阻塞 Redis
        let mut cursor: u64 = 0;
        let mut keys: Vec<String> = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = self
                .bounded(async {
                    let page: (u64, Vec<String>) = redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn)
                        .await?;
                    Ok::<_, CacheError>(page)
                })
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        if keys.is_empty() {
            return Ok(0);
        }

        keys.sort();
        keys.dedup();
        let removed: u64 = self
            .bounded(async {
                let removed: u64 = conn.del(&keys).await?;
                Ok::<_, CacheError>(removed)
            })
            .await?;
        tracing::debug!("Cleared {} keys matching {}", removed, pattern);
        Ok(removed)
    }
}
