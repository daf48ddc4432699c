//! 日志基础设施

use tracing::warn;
use tracing_subscriber::EnvFilter;

use super::config::DEFAULT_LOG_FILTER;

pub struct Logger;

impl Logger {
    /// 初始化全局 tracing 订阅者，重复调用不生效
    pub fn init(filter: &str) {
        let (env_filter, rejected) = resolve_filter(filter);

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .try_init();

        if let Some(reason) = rejected {
            warn!(
                filter,
                error = %reason,
                "RUST_LOG 无效，已改用默认过滤器 {}",
                DEFAULT_LOG_FILTER
            );
        }
    }
}

/// 解析过滤器；无效时返回默认过滤器和解析错误
fn resolve_filter(filter: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(filter) {
        Ok(env_filter) => (env_filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(err.to_string())),
    }
}
