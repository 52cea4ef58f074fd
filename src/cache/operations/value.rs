use std::future::Future;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::models::{SetOutcome, StoredValue, TOMBSTONE};
use crate::client::CacheClient;

impl CacheClient {
    /// 读取缓存值
    /// 墓碑读作 None，非 JSON 负载按原样当作字符串；不计入命中统计
    pub async fn get(&self, key: &str) -> Option<Value> {
        match self.lookup(key).await {
            Some(StoredValue::Present(value)) => Some(value),
            Some(StoredValue::Tombstone) | None => None,
        }
    }

    /// 写入缓存值，`ttl` 为 None 时使用配置的默认过期时间
    pub async fn store(&self, key: &str, value: &Value, ttl: Option<u64>) -> SetOutcome {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache value");
                return SetOutcome::failed(e);
            }
        };
        self.set_raw(key, &json, Some(ttl.unwrap_or(self.config().default_ttl)))
            .await
    }

    /// 穿透读取：命中直接返回，未命中时调用 `compute` 并回填
    ///
    /// 墓碑命中返回 Ok(None) 且不触发重算；`compute` 的错误原样向上传播；
    /// 回填失败只记录日志，计算结果照常返回。
    /// 不做并发去重：同一键的并发未命中可能都执行 `compute`，重复计算是成本不是错误
    pub async fn fetch<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<u64>,
        compute: F,
    ) -> Result<Option<Value>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Value>, E>>,
    {
        if let Some(stored) = self.lookup(key).await {
            self.stats.record_hit();
            return Ok(match stored {
                StoredValue::Present(value) => Some(value),
                StoredValue::Tombstone => None,
            });
        }

        self.stats.record_miss();
        let computed = compute().await?;

        if let Some(value) = &computed {
            let outcome = self.store(key, value, ttl).await;
            if !outcome.stored {
                debug!(key, "cache backfill skipped, returning computed value anyway");
            }
        }

        Ok(computed)
    }

    /// 删除缓存项
    /// `soft` 为 true 时写入墓碑：槽位仍被占用，读取方视为确认不存在
    pub async fn remove(&self, key: &str, soft: bool) -> bool {
        if soft {
            self.set_raw(key, TOMBSTONE, Some(self.config().default_ttl))
                .await
                .stored
        } else {
            self.delete(key).await > 0
        }
    }

    async fn lookup(&self, key: &str) -> Option<StoredValue> {
        self.get_raw(key).await.map(|raw| StoredValue::decode(&raw))
    }
}
