use redis::AsyncCommands;
use tracing::{debug, warn};

use crate::client::CacheClient;

/// 每轮 SCAN 的批量提示
const SCAN_BATCH: usize = 100;

impl CacheClient {
    /// 按通配符批量失效，返回删除数量
    ///
    /// 模式先加命名空间前缀再扫描，调用方只能影响自己前缀下的键。
    /// 只用游标式 SCAN，绝不使用阻塞整个键空间的 KEYS；
    /// 游标回到 0 表示扫描完成。失败时记录日志并返回已删除的数量
    pub async fn invalidate_pattern(&self, pattern: &str) -> u64 {
        let full_pattern = self.namespace().namespaced(pattern);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(pattern = %full_pattern, error = %e, "redis connection unavailable for SCAN");
                return 0;
            }
        };

        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;
        loop {
            let reply: Result<(u64, Vec<String>), _> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&full_pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;
            let (next_cursor, keys) = match reply {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(pattern = %full_pattern, error = %e, "redis SCAN failed");
                    return deleted;
                }
            };

            if !keys.is_empty() {
                match conn.del::<_, u64>(&keys).await {
                    Ok(count) => deleted += count,
                    Err(e) => {
                        warn!(pattern = %full_pattern, error = %e, "redis DEL failed during invalidation");
                        return deleted;
                    }
                }
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern = %full_pattern, deleted, "pattern invalidation finished");
        deleted
    }

    /// 清空本命名空间下的所有键
    pub async fn flush_prefix(&self) -> u64 {
        self.invalidate_pattern("*").await
    }
}
