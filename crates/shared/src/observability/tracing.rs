//! 日志初始化模块
//!
//! 基于 tracing-subscriber 构建日志输出，支持人类可读与 JSON 两种格式。
//! `RUST_LOG` 环境变量优先于配置中的日志级别。
//! 日志统一写到标准错误，标准输出留给演练模式的事件记录。

use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ObservabilityConfig;

/// 构建环境过滤器
///
/// 配置中的级别无法解析时回落到 info，避免因拼写错误导致完全没有日志。
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化全局日志订阅者
///
/// 重复初始化会返回错误（全局订阅者只能设置一次）。
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let fmt_layer = if config.json_logs {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_falls_back_on_invalid_level() {
        // 无论 RUST_LOG 是否设置，构建过滤器都不应 panic
        let _ = env_filter("not a [valid filter");
        let _ = env_filter("debug");
    }
}
