use dashmap::DashMap;

use crate::ratelimit::config::{RateLimitConfig, RateLimitResult};

/// 每次判定触发全表清扫的概率
const SWEEP_PROBABILITY: f64 = 0.01;

/// 进程内滑动窗口计数器
/// 远端存储不可用时的回退，纯内存、不做 I/O、不会阻塞
///
/// 只对单进程实例正确：多实例各自独立限流，互不协调。
/// 这是设计上的回退方案，不能替代水平扩展下的分布式限流
#[derive(Debug, Default)]
pub struct LocalWindowTracker {
    windows: DashMap<String, Vec<i64>>,
}

impl LocalWindowTracker {
    pub fn new() -> Self {
        LocalWindowTracker {
            windows: DashMap::new(),
        }
    }

    /// 滑动窗口判定
    /// 过滤掉 `window_start` 之前的时间戳后计数：达到上限则拒绝且不追加，
    /// 否则追加 `now` 并放行
    pub fn check_limit(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now: i64,
        window_start: i64,
    ) -> RateLimitResult {
        let reset = now + config.window as i64;
        let result = {
            let mut entry = self.windows.entry(key.to_string()).or_default();
            let stamps = entry.value_mut();
            stamps.retain(|&stamp| stamp > window_start);

            if stamps.len() as u64 >= config.limit {
                RateLimitResult {
                    success: false,
                    limit: config.limit,
                    remaining: 0,
                    reset,
                }
            } else {
                stamps.push(now);
                RateLimitResult {
                    success: true,
                    limit: config.limit,
                    remaining: config.limit - stamps.len() as u64,
                    reset,
                }
            }
        };

        // 小概率清扫整表，限制一次性主体带来的内存增长；尽力而为，不影响判定正确性
        if rand::random::<f64>() < SWEEP_PROBABILITY {
            self.sweep(window_start);
        }

        result
    }

    fn sweep(&self, window_start: i64) {
        self.windows
            .retain(|_, stamps| stamps.iter().any(|&stamp| stamp > window_start));
    }
}
