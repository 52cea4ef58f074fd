// 限流模块
// 分布式滑动窗口、本地回退窗口与固定窗口计数器

pub mod config;
pub mod counter;
pub mod distributed;
pub mod local;

pub use config::{RateLimitConfig, RateLimitResult, presets, rate_limit_headers};
pub use counter::CounterLimiter;
pub use distributed::SlidingWindowLimiter;
pub use local::LocalWindowTracker;
