// entrolytics 缓存与限流层
// 基于 Redis 的缓存穿透读取、模式失效与滑动窗口限流

pub mod cache;
pub mod client;
pub mod config;
pub mod ratelimit;

pub use cache::keys::KeyNamespace;
pub use cache::models::{CacheStatsSnapshot, SetOutcome, StoredValue, TOMBSTONE};
pub use client::CacheClient;
pub use config::CacheConfig;
pub use ratelimit::config::{RateLimitConfig, RateLimitResult, presets, rate_limit_headers};
pub use ratelimit::counter::CounterLimiter;
pub use ratelimit::distributed::SlidingWindowLimiter;
pub use ratelimit::local::LocalWindowTracker;
