use serde::{Deserialize, Serialize};

/// 限流策略
/// 标识一类受限操作，不绑定具体主体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// 操作类别标识
    pub bucket: String,
    /// 窗口内最大请求数
    pub limit: u64,
    /// 窗口长度（秒）
    pub window: u64,
}

impl RateLimitConfig {
    pub fn new(bucket: impl Into<String>, limit: u64, window: u64) -> Self {
        RateLimitConfig {
            bucket: bucket.into(),
            limit,
            window,
        }
    }
}

/// 单次限流判定结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResult {
    /// 本次请求是否放行
    pub success: bool,
    pub limit: u64,
    /// 本次请求之后窗口内剩余额度
    pub remaining: u64,
    /// 窗口完全清空的时间（epoch 秒），上界近似值
    pub reset: i64,
}

/// 常用操作类别的默认策略
/// 应用级默认值，可以自由覆盖
pub mod presets {
    use super::RateLimitConfig;

    pub fn token_exchange() -> RateLimitConfig {
        RateLimitConfig::new("token_exchange", 5, 60)
    }

    pub fn event_ingest() -> RateLimitConfig {
        RateLimitConfig::new("event_ingest", 1000, 60)
    }

    pub fn query() -> RateLimitConfig {
        RateLimitConfig::new("query", 100, 60)
    }

    pub fn export() -> RateLimitConfig {
        RateLimitConfig::new("export", 10, 300)
    }

    pub fn auth() -> RateLimitConfig {
        RateLimitConfig::new("auth", 10, 60)
    }
}

/// 生成标准限流响应头，拒绝时附带 Retry-After
pub fn rate_limit_headers(result: &RateLimitResult) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        ("X-RateLimit-Limit", result.limit.to_string()),
        ("X-RateLimit-Remaining", result.remaining.to_string()),
        ("X-RateLimit-Reset", result.reset.to_string()),
    ];
    if !result.success {
        let retry_after = (result.reset - chrono::Utc::now().timestamp()).max(0);
        headers.push(("Retry-After", retry_after.to_string()));
    }
    headers
}
