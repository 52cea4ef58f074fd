/// 键命名空间
/// 所有面向存储的操作都必须经过这里加前缀，模式失效的通配符也一样
#[derive(Debug, Clone)]
pub struct KeyNamespace {
    prefix: String,
}

impl KeyNamespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        KeyNamespace {
            prefix: prefix.into(),
        }
    }

    /// 生成带前缀的存储键
    pub fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// 生成限流主体键：`ratelimit:{bucket}:{identifier}`
    pub fn rate_limit_key(&self, bucket: &str, identifier: &str) -> String {
        self.namespaced(&format!("ratelimit:{}:{}", bucket, identifier))
    }

    /// 生成固定窗口计数器键
    pub fn counter_key(&self, identifier: &str) -> String {
        self.namespaced(&format!("ratelimit:count:{}", identifier))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for KeyNamespace {
    fn default() -> Self {
        KeyNamespace::new(crate::config::DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_prepends_prefix() {
        let ns = KeyNamespace::default();
        assert_eq!(ns.namespaced("user:1"), "entrolytics:user:1");
    }

    #[test]
    fn rate_limit_key_includes_bucket_and_identifier() {
        let ns = KeyNamespace::new("test:");
        assert_eq!(
            ns.rate_limit_key("token_exchange", "10.0.0.1"),
            "test:ratelimit:token_exchange:10.0.0.1"
        );
    }

    #[test]
    fn custom_prefix_applies_to_patterns_too() {
        let ns = KeyNamespace::new("app:");
        assert_eq!(ns.namespaced("user:*"), "app:user:*");
    }
}
