// 缓存模块
// 包含键命名空间、缓存数据结构和操作逻辑

pub mod keys;
pub mod models;
pub mod operations;

pub use keys::KeyNamespace;
pub use models::{CacheStats, CacheStatsSnapshot, SetOutcome, StoredValue, TOMBSTONE};
