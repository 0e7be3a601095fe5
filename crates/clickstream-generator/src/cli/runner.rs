//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑：合并命令行参数与配置、
//! 建立一次性的数据库/Kafka 连接、运行种子加载与点击流生成。

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use clickstream_shared::config::{AppConfig, GeneratorConfig};
use clickstream_shared::database::Database;
use clickstream_shared::error::ClickstreamError;
use clickstream_shared::retry::RetryPolicy;

use super::commands::StreamArgs;
use crate::event_generator::{
    EventFactory, KafkaSink, RecordSink, RunStats, SessionDriver, StdoutSink, StreamRunner,
};
use crate::generators::{FakerValues, RngSource};
use crate::seed::{PgSeedStore, SeedLoader, SeedReport};

/// 命令执行器
///
/// 持有合并后的配置，作为 CLI 与业务逻辑之间的桥梁。
pub struct CommandRunner {
    config: AppConfig,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 执行 run 命令：种子数据（可跳过）+ 点击流
    pub async fn run_all(
        &self,
        num_user_records: Option<u32>,
        stream: &StreamArgs,
        skip_seed: bool,
    ) -> Result<()> {
        let generator = self.generator_config(num_user_records, stream);
        // 先校验参数，避免写完种子数据才发现会话参数非法
        generator.validate().context("点击流参数无效")?;

        if skip_seed {
            info!("跳过种子数据写入");
        } else {
            self.seed(generator.user_pool_size, generator.rng_seed).await?;
        }

        self.stream(generator, stream.dry_run).await?;
        Ok(())
    }

    /// 执行 seed 命令
    pub async fn run_seed(&self, num_user_records: Option<u32>) -> Result<()> {
        let user_pool_size = num_user_records.unwrap_or(self.config.generator.user_pool_size);
        self.seed(user_pool_size, self.config.generator.rng_seed)
            .await?;
        Ok(())
    }

    /// 执行 stream 命令
    pub async fn run_stream(&self, user_pool_size: Option<u32>, stream: &StreamArgs) -> Result<()> {
        let generator = self.generator_config(user_pool_size, stream);
        generator.validate().context("点击流参数无效")?;
        self.stream(generator, stream.dry_run).await?;
        Ok(())
    }

    // ========================================================================
    // 辅助方法
    // ========================================================================

    /// 命令行参数覆盖配置文件中的生成参数
    pub fn generator_config(&self, user_pool_size: Option<u32>, stream: &StreamArgs) -> GeneratorConfig {
        let base = &self.config.generator;
        GeneratorConfig {
            user_pool_size: user_pool_size.unwrap_or(base.user_pool_size),
            sessions: stream.num_click_records.unwrap_or(base.sessions),
            workers: stream.workers.unwrap_or(base.workers),
            rng_seed: stream.rng_seed.or(base.rng_seed),
            progress_every: base.progress_every,
        }
    }

    async fn seed(&self, user_pool_size: u32, rng_seed: Option<u64>) -> Result<SeedReport> {
        // 在连接数据库、执行 DDL 之前拒绝空用户池
        if user_pool_size == 0 {
            return Err(ClickstreamError::invalid_argument(
                "user_pool_size",
                "用户池大小必须大于 0",
            ))
            .context("种子数据参数无效");
        }

        let db = Database::connect(&self.config.database)
            .await
            .context("连接种子数据库失败")?;
        db.health_check().await.context("种子数据库健康检查失败")?;
        let store = PgSeedStore::new(db.clone());
        store.ensure_schema().await.context("初始化 commerce schema 失败")?;

        let loader = SeedLoader::new(
            Arc::new(store),
            Arc::new(FakerValues),
            RetryPolicy::from(&self.config.retry),
        );
        // 种子数据使用与 worker 0 不同的随机序列
        let mut random = RngSource::for_worker(rng_seed.map(|s| s.wrapping_sub(1)), 0);
        let result = loader.load(user_pool_size, &mut random).await;

        db.close().await;
        result.context("写入种子数据失败")
    }

    async fn stream(&self, generator: GeneratorConfig, dry_run: bool) -> Result<RunStats> {
        let sink: Arc<dyn RecordSink> = if dry_run {
            info!("演练模式：事件输出到标准输出");
            Arc::new(StdoutSink)
        } else {
            Arc::new(
                KafkaSink::connect(&self.config.kafka, RetryPolicy::from(&self.config.retry))
                    .context("创建 Kafka 生产者失败")?,
            )
        };

        drive(sink, generator).await
    }
}

/// 在给定 sink 上运行点击流，结束后关闭 sink
///
/// 运行失败时返回运行错误；运行成功但关闭（刷新）失败时返回关闭错误。
async fn drive(sink: Arc<dyn RecordSink>, generator: GeneratorConfig) -> Result<RunStats> {
    let driver = SessionDriver::new(EventFactory::new(Arc::new(FakerValues)), sink.clone());
    let runner = StreamRunner::new(driver, generator).context("点击流参数无效")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal_task = tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let result = runner.run(shutdown_rx).await;
    signal_task.abort();

    // 无论成功与否都尝试刷新已缓冲的消息
    let closed = sink.close().await;
    match (result, closed) {
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "关闭 sink 失败");
            }
            Err(e).context("生成点击流失败")
        }
        (Ok(_), Err(e)) => Err(e).context("关闭 sink 失败，部分事件可能未送达"),
        (Ok(stats), Ok(())) => Ok(stats),
    }
}

/// 等待 Ctrl+C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("收到 Ctrl+C，完成当前会话后停止"),
        Err(e) => {
            warn!(error = %e, "无法监听 Ctrl+C 信号");
            std::future::pending::<()>().await;
        }
    }
}

// ============================================================================
// 单元测试
// ============================================================================
