use std::sync::Arc;

use redis::RedisError;
use tracing::warn;
use uuid::Uuid;

use crate::client::CacheClient;
use crate::ratelimit::config::{RateLimitConfig, RateLimitResult};
use crate::ratelimit::local::LocalWindowTracker;

/// 分布式滑动窗口限流器
/// 四步有序集合事务在存储端原子执行，并发判定不会被拆开；
/// 存储不可用时退化为本地窗口，宁可近似也不因依赖故障拒绝服务
pub struct SlidingWindowLimiter {
    client: Arc<CacheClient>,
    fallback: LocalWindowTracker,
}

impl SlidingWindowLimiter {
    pub fn new(client: Arc<CacheClient>) -> Self {
        Self::with_tracker(client, LocalWindowTracker::new())
    }

    /// 注入回退计数器，便于测试时每个用例使用独立状态
    pub fn with_tracker(client: Arc<CacheClient>, fallback: LocalWindowTracker) -> Self {
        SlidingWindowLimiter { client, fallback }
    }

    /// 滑动窗口判定
    /// 事务失败时本次请求改由本地回退判定，绝不返回错误
    pub async fn check_limit(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
    ) -> RateLimitResult {
        let now = chrono::Utc::now().timestamp();
        let window_start = now - config.window as i64;
        let key = self
            .client
            .namespace()
            .rate_limit_key(&config.bucket, identifier);

        match self.check_remote(&key, config, now, window_start).await {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    bucket = %config.bucket,
                    identifier,
                    error = %e,
                    "distributed rate limit check failed, falling back to local tracker"
                );
                self.fallback.check_limit(&key, config, now, window_start)
            }
        }
    }

    /// 原子事务：清理过期成员、取计数、登记本次请求、刷新过期时间
    /// 拒绝判定用的是登记之前的计数
    async fn check_remote(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now: i64,
        window_start: i64,
    ) -> Result<RateLimitResult, RedisError> {
        let mut conn = self.client.connection().await?;

        // 成员带随机成分，同一秒内的请求不会互相覆盖
        let member = format!("{}-{}", now, Uuid::new_v4());
        let mut pipe = redis::pipe();
        pipe.atomic()
            .zrembyscore(key, 0, window_start)
            .ignore()
            .zcard(key)
            .zadd(key, member, now)
            .ignore()
            .expire(key, config.window as i64)
            .ignore();
        let (count,): (i64,) = pipe.query_async(&mut conn).await?;

        let reset = now + config.window as i64;
        if count as u64 >= config.limit {
            Ok(RateLimitResult {
                success: false,
                limit: config.limit,
                remaining: 0,
                reset,
            })
        } else {
            // 减一是刚登记的这次请求
            let remaining = config.limit.saturating_sub(count as u64 + 1);
            Ok(RateLimitResult {
                success: true,
                limit: config.limit,
                remaining,
                reset,
            })
        }
    }
}
