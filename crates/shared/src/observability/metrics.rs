//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    register_common_metrics();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册生成器相关指标的描述
fn register_common_metrics() {
    metrics::describe_counter!(
        "clickstream_events_sent_total",
        "Total number of events delivered to a channel"
    );
    metrics::describe_counter!(
        "clickstream_sessions_total",
        "Total number of simulated sessions"
    );
    metrics::describe_histogram!(
        "clickstream_session_events",
        "Number of events emitted per session"
    );
    metrics::describe_counter!(
        "clickstream_send_retries_total",
        "Total number of retried send attempts"
    );
    metrics::describe_counter!("seed_records_total", "Total number of seed rows written");
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录一次成功投递
#[inline]
pub fn record_event_sent(channel: &str) {
    metrics::counter!(
        "clickstream_events_sent_total",
        "channel" => channel.to_string()
    )
    .increment(1);
}

/// 记录一个已完成的会话及其事件数
#[inline]
pub fn record_session(events: u64) {
    metrics::counter!("clickstream_sessions_total").increment(1);
    metrics::histogram!("clickstream_session_events").record(events as f64);
}

/// 记录写入的种子数据行
#[inline]
pub fn record_seed_rows(table: &str, rows: u64) {
    metrics::counter!("seed_records_total", "table" => table.to_string()).increment(rows);
}
