use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

/// 软删除墓碑的存储形式
/// 保持为可识别的字符串，兼容不认识标记表示的读取方
pub const TOMBSTONE: &str = "DELETED";

/// 存储值的内部表示
/// 墓碑表示“确认不存在”，与“从未缓存”区分开
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Present(Value),
    Tombstone,
}

impl StoredValue {
    /// 解码存储的原始字节
    /// JSON 解析失败时按原样当作字符串返回，纯字符串也是合法的缓存负载
    pub fn decode(raw: &str) -> Self {
        if raw == TOMBSTONE {
            return StoredValue::Tombstone;
        }
        match serde_json::from_str(raw) {
            Ok(value) => StoredValue::Present(value),
            Err(_) => StoredValue::Present(Value::String(raw.to_string())),
        }
    }
}

/// 写入操作的结果
/// 写入失败只记录不抛出，调用方可以通过 `error` 观察失败原因
#[derive(Debug, Clone, Default)]
pub struct SetOutcome {
    pub stored: bool,
    pub error: Option<String>,
}

impl SetOutcome {
    pub fn ok() -> Self {
        SetOutcome {
            stored: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        SetOutcome {
            stored: false,
            error: Some(error.to_string()),
        }
    }
}

/// 进程内命中/未命中计数
/// 只由穿透读取路径和显式重置修改
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        CacheStatsSnapshot {
            hits,
            misses,
            hit_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_recognizes_tombstone() {
        assert_eq!(StoredValue::decode("DELETED"), StoredValue::Tombstone);
    }

    #[test]
    fn decode_parses_structured_json() {
        let decoded = StoredValue::decode(r#"{"count":3,"tags":["a","b"]}"#);
        assert_eq!(
            decoded,
            StoredValue::Present(json!({"count": 3, "tags": ["a", "b"]}))
        );
    }

    #[test]
    fn decode_falls_back_to_raw_string() {
        // 不是合法 JSON 的负载按原样返回
        let decoded = StoredValue::decode("plain cached text");
        assert_eq!(
            decoded,
            StoredValue::Present(Value::String("plain cached text".to_string()))
        );
    }

    #[test]
    fn stats_start_at_zero_with_zero_hit_rate() {
        let stats = CacheStats::default();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hits, 0);
        assert_eq!(snapshot.misses, 0);
        assert_eq!(snapshot.hit_rate, 0.0);
    }

    #[test]
    fn stats_compute_hit_rate() {
        let stats = CacheStats::default();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hits, 3);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.hit_rate, 0.75);
    }

    #[test]
    fn stats_reset_zeroes_both_counters() {
        let stats = CacheStats::default();
        stats.record_hit();
        stats.record_miss();
        stats.reset();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hits, 0);
        assert_eq!(snapshot.misses, 0);
        assert_eq!(snapshot.hit_rate, 0.0);
    }
}
