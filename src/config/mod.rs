use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// 缓存后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub app_name: String,
    pub api_prefix: String,
    pub server_host: String,
    pub server_port: u16,
    pub upstream_base_url: String,
    pub upstream_timeout_secs: u64,
    pub redis_url: String,
    pub redis_timeout_secs: u64,
    pub cache_enabled: bool,
    pub cache_backend: CacheBackend,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: u64,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_name: "Streaming Website".to_string(),
            api_prefix: "/api/v1".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            upstream_base_url: "https://phimapi.com".to_string(),
            upstream_timeout_secs: 30,
            redis_url: "redis://localhost:6379/0".to_string(),
            redis_timeout_secs: 2,
            cache_enabled: true,
            cache_backend: CacheBackend::Redis,
            cache_ttl_secs: 3600,
            cache_max_entries: 10_000,
            cors_origins: vec!["http://localhost:8000".to_string()],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载配置，缺失的项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let cors_origins = match lookup("BACKEND_CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        Ok(Config {
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
            api_prefix: lookup("API_V1_PREFIX").unwrap_or(defaults.api_prefix),
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            upstream_base_url: lookup("KKPHIM_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout_secs: parse_or(
                &lookup,
                "KKPHIM_API_TIMEOUT",
                defaults.upstream_timeout_secs,
            )?,
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            redis_timeout_secs: parse_or(&lookup, "REDIS_TIMEOUT", defaults.redis_timeout_secs)?,
            cache_enabled: parse_bool_or(&lookup, "CACHE_ENABLED", defaults.cache_enabled)?,
            cache_backend: parse_or(&lookup, "CACHE_BACKEND", defaults.cache_backend)?,
            cache_ttl_secs: parse_or(&lookup, "CACHE_TTL", defaults.cache_ttl_secs)?,
            cache_max_entries: parse_or(&lookup, "CACHE_MAX_ENTRIES", defaults.cache_max_entries)?,
            cors_origins,
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// 单次 Redis 操作（含建连）的时间上限
    pub fn redis_timeout(&self) -> Duration {
        Duration::from_secs(self.redis_timeout_secs.max(1))
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.upstream_base_url, "https://phimapi.com");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert!(config.cache_enabled);
        assert_eq!(config.cache_backend, CacheBackend::Redis);
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.redis_timeout(), Duration::from_secs(2));
        assert_eq!(config.cache_max_entries, 10_000);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("KKPHIM_API_BASE_URL", "http://127.0.0.1:9000/"),
            ("KKPHIM_API_TIMEOUT", "5"),
            ("CACHE_ENABLED", "false"),
            ("CACHE_BACKEND", "memory"),
            ("CACHE_TTL", "120"),
            ("CACHE_MAX_ENTRIES", "500"),
            ("REDIS_TIMEOUT", "1"),
            ("BACKEND_CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();

        assert_eq!(config.upstream_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.upstream_timeout_secs, 5);
        assert!(!config.cache_enabled);
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.cache_ttl_secs, 120);
        assert_eq!(config.cache_max_entries, 500);
        assert_eq!(config.redis_timeout(), Duration::from_secs(1));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = Config::from_lookup(lookup_from(&[("CACHE_TTL", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "CACHE_TTL", .. }));

        let err = Config::from_lookup(lookup_from(&[("CACHE_ENABLED", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "CACHE_ENABLED", .. }));
    }
}
