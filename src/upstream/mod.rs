// 上游影片目录 API 客户端

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream transport error: {0}")]
    Transport(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("upstream returned malformed body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if let Some(status) = e.status() {
            UpstreamError::Status(status.as_u16())
        } else if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// 查询参数，按固定顺序发送
pub type Query = Vec<(&'static str, String)>;

/// 上游数据源
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    /// 单次 GET，不重试
    async fn get_json(&self, path: &str, query: &[(&'static str, String)]) -> Result<Value, UpstreamError>;
}

/// 基于 reqwest 的上游客户端
#[derive(Clone)]
pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Upstream GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        let body = response.json::<Value>().await?;
        Ok(body)
    }
}
