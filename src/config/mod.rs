use std::env;
use std::time::Duration;

/// 默认键前缀
pub const DEFAULT_PREFIX: &str = "entrolytics:";

/// 默认缓存过期时间（秒）
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// 默认最大重连次数
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: usize = 10;

/// 默认连接超时（毫秒）
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct CacheConfig {
    pub url: String,
    pub prefix: String,
    pub default_ttl: u64,
    pub max_reconnect_attempts: usize,
    pub connect_timeout_ms: u64,
}

impl CacheConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(CacheConfig {
            url: env::var("REDIS_URL")?,
            prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
            max_reconnect_attempts: env::var("CACHE_MAX_RECONNECT_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_RECONNECT_ATTEMPTS),
            connect_timeout_ms: env::var("CACHE_CONNECT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
        })
    }

    pub fn new(url: impl Into<String>) -> Self {
        CacheConfig {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            default_ttl: DEFAULT_TTL_SECS,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = CacheConfig::default();
        assert_eq!(config.prefix, "entrolytics:");
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.max_reconnect_attempts, 10);
        assert_eq!(config.connect_timeout_ms, 10_000);
        assert_eq!(config.connect_timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn new_overrides_url_only() {
        let config = CacheConfig::new("redis://cache.internal:6380");
        assert_eq!(config.url, "redis://cache.internal:6380");
        assert_eq!(config.prefix, DEFAULT_PREFIX);
    }
}
