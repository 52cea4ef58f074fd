// 降级路径测试
// 指向不可达的 Redis 地址，验证存储故障时各操作的失败语义：
// 缓存面吸收为安全默认值，滑动窗口退化为本地判定，计数器放行

use serde_json::{Value, json};

use entrolytics_cache::{
    CacheClient, CacheConfig, CounterLimiter, RateLimitConfig, SlidingWindowLimiter,
};
use std::sync::Arc;

fn unreachable_client() -> CacheClient {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let config = CacheConfig {
        url: "redis://127.0.0.1:1".to_string(),
        prefix: "test:".to_string(),
        default_ttl: 60,
        max_reconnect_attempts: 1,
        connect_timeout_ms: 200,
    };
    CacheClient::new(config).expect("client construction does no I/O")
}

#[tokio::test]
async fn sliding_window_falls_back_to_local_tracker() {
    let limiter = SlidingWindowLimiter::new(Arc::new(unreachable_client()));
    let config = RateLimitConfig::new("x", 3, 10);

    let mut results = Vec::new();
    for _ in 0..4 {
        results.push(limiter.check_limit("u1", &config).await);
    }

    assert!(results[0].success);
    assert!(results[1].success);
    assert!(results[2].success);
    assert!(!results[3].success);
    assert_eq!(results[3].remaining, 0);
    assert_eq!(results[3].limit, 3);
}

#[tokio::test]
async fn fallback_results_are_always_well_formed() {
    let limiter = SlidingWindowLimiter::new(Arc::new(unreachable_client()));
    let config = RateLimitConfig::new("events", 100, 60);

    let result = limiter.check_limit("10.0.0.1", &config).await;
    assert!(result.success);
    assert_eq!(result.limit, 100);
    assert_eq!(result.remaining, 99);
    assert!(result.reset > chrono::Utc::now().timestamp());
}

#[tokio::test]
async fn counter_limiter_fails_open() {
    let limiter = CounterLimiter::new(Arc::new(unreachable_client()));

    assert!(!limiter.is_limited("u1", 2, 60).await);
    assert!(!limiter.is_limited("u1", 2, 60).await);
    assert!(!limiter.is_limited("u1", 2, 60).await);
    assert_eq!(limiter.remaining("u1", 2).await, 2);
}

#[tokio::test]
async fn reads_absorb_to_safe_defaults() {
    let client = unreachable_client();

    assert_eq!(client.get("user:1").await, None);
    assert_eq!(client.get_raw("user:1").await, None);
    assert_eq!(client.delete("user:1").await, 0);
    assert_eq!(client.incr_by("counter", 1).await, 0);
    assert!(!client.expire("user:1", 60).await);
    assert_eq!(client.ttl("user:1").await, -2);
    assert!(!client.exists("user:1").await);
}

#[tokio::test]
async fn writes_report_failure_without_raising() {
    let client = unreachable_client();

    let outcome = client.store("user:1", &json!({"id": 1}), None).await;
    assert!(!outcome.stored);
    assert!(outcome.error.is_some());

    // 软删除同样只报告失败
    assert!(!client.remove("user:1", true).await);
}

#[tokio::test]
async fn fetch_still_computes_and_returns_the_value() {
    let client = unreachable_client();

    let value = client
        .fetch("report:7", None, || async {
            Ok::<Option<Value>, String>(Some(json!({"rows": 12})))
        })
        .await
        .expect("compute succeeded");
    assert_eq!(value, Some(json!({"rows": 12})));

    // 读失败按未命中计
    let stats = client.stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn fetch_propagates_compute_errors() {
    let client = unreachable_client();

    let result = client
        .fetch("report:8", None, || async {
            Err::<Option<Value>, String>("upstream query failed".to_string())
        })
        .await;
    assert_eq!(result, Err("upstream query failed".to_string()));
}

#[tokio::test]
async fn pattern_invalidation_returns_zero_on_failure() {
    let client = unreachable_client();

    assert_eq!(client.invalidate_pattern("user:*").await, 0);
    assert_eq!(client.flush_prefix().await, 0);
}
