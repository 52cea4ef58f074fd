use std::sync::Arc;

use redis::{AsyncCommands, RedisError};
use tracing::warn;

use crate::client::CacheClient;

/// 固定窗口计数限流器
/// 一次往返代替四步事务，精度换吞吐：窗口边界处最坏可放行 2×limit 次请求。
/// 存储失败时放行（fail open），依赖故障不应变成全量拒绝
pub struct CounterLimiter {
    client: Arc<CacheClient>,
}

impl CounterLimiter {
    pub fn new(client: Arc<CacheClient>) -> Self {
        CounterLimiter { client }
    }

    /// 判断是否超限
    /// 递增后的计数超过 `limit` 才算超限；首次请求启动窗口计时
    pub async fn is_limited(&self, identifier: &str, limit: u64, window_secs: u64) -> bool {
        match self.bump(identifier, window_secs).await {
            Ok(count) => count > limit,
            Err(e) => {
                warn!(identifier, error = %e, "counter rate limit check failed, failing open");
                false
            }
        }
    }

    /// 查询剩余额度，不递增计数；失败时按全额放行
    pub async fn remaining(&self, identifier: &str, limit: u64) -> u64 {
        let key = self.client.namespace().counter_key(identifier);
        let current = match self.client.connection().await {
            Ok(mut conn) => match conn.get::<_, Option<u64>>(&key).await {
                Ok(value) => value.unwrap_or(0),
                Err(e) => {
                    warn!(identifier, error = %e, "counter read failed, failing open");
                    return limit;
                }
            },
            Err(e) => {
                warn!(identifier, error = %e, "redis connection unavailable for counter read");
                return limit;
            }
        };
        limit.saturating_sub(current)
    }

    async fn bump(&self, identifier: &str, window_secs: u64) -> Result<u64, RedisError> {
        let key = self.client.namespace().counter_key(identifier);
        let mut conn = self.client.connection().await?;

        let count: u64 = conn.incr(&key, 1u64).await?;
        if count == 1 {
            // 新窗口的第一次请求启动过期计时
            let _: bool = conn.expire(&key, window_secs as i64).await?;
        }
        Ok(count)
    }
}
