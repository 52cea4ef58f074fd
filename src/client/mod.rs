use redis::{AsyncCommands, Client as RedisClient, RedisError};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tokio::sync::Mutex;
use tracing::warn;

use crate::cache::keys::KeyNamespace;
use crate::cache::models::{CacheStats, CacheStatsSnapshot, SetOutcome};
use crate::config::CacheConfig;

/// 缓存客户端
/// 键值层面的所有存储错误都在这里吸收为安全默认值并记录日志，
/// 这一层的契约是绝不成为调用方失败的原因；
/// 连接建立失败和调用方提供的计算函数的失败除外，它们照常向上传播
pub struct CacheClient {
    client: RedisClient,
    // 单槽连接记忆：并发调用共享同一次在途连接尝试
    manager: Mutex<Option<ConnectionManager>>,
    config: CacheConfig,
    namespace: KeyNamespace,
    pub(crate) stats: CacheStats,
}

impl CacheClient {
    /// 创建客户端，不做任何 I/O，首次操作时才建立连接
    pub fn new(config: CacheConfig) -> Result<Self, RedisError> {
        let client = RedisClient::open(config.url.as_str())?;
        let namespace = KeyNamespace::new(config.prefix.clone());
        Ok(CacheClient {
            client,
            manager: Mutex::new(None),
            config,
            namespace,
            stats: CacheStats::default(),
        })
    }

    /// 从环境变量加载配置并创建客户端
    pub fn from_env() -> Result<Self, RedisError> {
        let config = CacheConfig::from_env().map_err(|e| {
            RedisError::from((
                redis::ErrorKind::InvalidClientConfig,
                "missing configuration",
                e.to_string(),
            ))
        })?;
        Self::new(config)
    }

    /// 获取共享连接
    /// 互斥槽保证同一时刻只有一次连接尝试在途，并发调用方等待同一个结果；
    /// 重连退避和次数上限由 ConnectionManager 执行，超限对触发方是终态失败
    pub(crate) async fn connection(&self) -> Result<ConnectionManager, RedisError> {
        let mut slot = self.manager.lock().await;
        if let Some(manager) = slot.as_ref() {
            return Ok(manager.clone());
        }

        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(self.config.connect_timeout())
            .set_number_of_retries(self.config.max_reconnect_attempts);
        let manager =
            ConnectionManager::new_with_config(self.client.clone(), manager_config).await?;
        *slot = Some(manager.clone());
        Ok(manager)
    }

    pub fn namespace(&self) -> &KeyNamespace {
        &self.namespace
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// 读取原始字节，失败时返回 None
    pub async fn get_raw(&self, key: &str) -> Option<String> {
        let full_key = self.namespace.namespaced(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis connection unavailable for GET");
                return None;
            }
        };
        match conn.get::<_, Option<String>>(&full_key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis GET failed");
                None
            }
        }
    }

    /// 写入原始字节，`ttl` 为 None 时不设置过期
    /// 失败只记录不抛出，结果里带可选诊断信息
    pub async fn set_raw(&self, key: &str, value: &str, ttl: Option<u64>) -> SetOutcome {
        let full_key = self.namespace.namespaced(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis connection unavailable for SET");
                return SetOutcome::failed(e);
            }
        };
        let result = match ttl {
            Some(seconds) => conn.set_ex::<_, _, ()>(&full_key, value, seconds).await,
            None => conn.set::<_, _, ()>(&full_key, value).await,
        };
        match result {
            Ok(()) => SetOutcome::ok(),
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis SET failed");
                SetOutcome::failed(e)
            }
        }
    }

    /// 删除键，返回删除数量，失败时返回 0
    pub async fn delete(&self, key: &str) -> u64 {
        let full_key = self.namespace.namespaced(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis connection unavailable for DEL");
                return 0;
            }
        };
        match conn.del::<_, u64>(&full_key).await {
            Ok(count) => count,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis DEL failed");
                0
            }
        }
    }

    /// 原子递增，失败时返回 0
    pub async fn incr_by(&self, key: &str, amount: i64) -> i64 {
        let full_key = self.namespace.namespaced(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis connection unavailable for INCRBY");
                return 0;
            }
        };
        match conn.incr::<_, _, i64>(&full_key, amount).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis INCRBY failed");
                0
            }
        }
    }

    /// 原子递减，失败时返回 0
    pub async fn decr_by(&self, key: &str, amount: i64) -> i64 {
        let full_key = self.namespace.namespaced(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis connection unavailable for DECRBY");
                return 0;
            }
        };
        match conn.decr::<_, _, i64>(&full_key, amount).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis DECRBY failed");
                0
            }
        }
    }

    /// 设置键过期时间，失败时返回 false
    pub async fn expire(&self, key: &str, seconds: i64) -> bool {
        let full_key = self.namespace.namespaced(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis connection unavailable for EXPIRE");
                return false;
            }
        };
        match conn.expire::<_, bool>(&full_key, seconds).await {
            Ok(set) => set,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis EXPIRE failed");
                false
            }
        }
    }

    /// 查询剩余过期时间，失败时返回 -2（与键不存在一致）
    pub async fn ttl(&self, key: &str) -> i64 {
        let full_key = self.namespace.namespaced(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis connection unavailable for TTL");
                return -2;
            }
        };
        match conn.ttl::<_, i64>(&full_key).await {
            Ok(seconds) => seconds,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis TTL failed");
                -2
            }
        }
    }

    /// 判断键是否存在，失败时返回 false
    pub async fn exists(&self, key: &str) -> bool {
        let full_key = self.namespace.namespaced(key);
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis connection unavailable for EXISTS");
                return false;
            }
        };
        match conn.exists::<_, bool>(&full_key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key = %full_key, error = %e, "redis EXISTS failed");
                false
            }
        }
    }
}
