//! 点击流运行器
//!
//! 把 `sessions` 个会话分配给若干 worker 执行。每个会话完整地在一个 worker 上运行，
//! 因此会话内部的事件顺序不受并行影响；会话之间的顺序没有约定。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use clickstream_shared::config::GeneratorConfig;
use clickstream_shared::error::ClickstreamError;
use clickstream_shared::observability::metrics::record_session;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use super::session::SessionDriver;
use crate::generators::RngSource;

/// 一次运行的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub sessions: u64,
    pub clicks: u64,
    pub checkouts: u64,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn events(&self) -> u64 {
        self.clicks + self.checkouts
    }

    /// 每秒投递事件数
    pub fn events_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.events() as f64 / secs
        } else {
            0.0
        }
    }
}

/// worker 之间共享的计数器
#[derive(Default)]
struct Counters {
    claimed: AtomicU64,
    completed: AtomicU64,
    clicks: AtomicU64,
    checkouts: AtomicU64,
}

/// 点击流运行器
pub struct StreamRunner {
    driver: SessionDriver,
    config: GeneratorConfig,
}

impl StreamRunner {
    /// 创建运行器，参数非法时在产生任何事件之前失败
    pub fn new(driver: SessionDriver, config: GeneratorConfig) -> Result<Self, ClickstreamError> {
        config.validate()?;
        Ok(Self { driver, config })
    }

    /// 执行全部会话
    ///
    /// `shutdown` 变为 `true` 后，各 worker 完成手头的会话即退出。
    /// 任一 worker 出错时终止其余 worker 并返回第一个错误。
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> Result<RunStats, ClickstreamError> {
        let started = Instant::now();
        let counters = Arc::new(Counters::default());

        info!(
            sessions = self.config.sessions,
            user_pool_size = self.config.user_pool_size,
            workers = self.config.workers,
            rng_seed = ?self.config.rng_seed,
            "开始生成点击流"
        );

        let mut workers = JoinSet::new();
        for worker in 0..self.config.workers {
            let driver = self.driver.clone();
            let config = self.config.clone();
            let counters = counters.clone();
            let shutdown = shutdown.clone();
            workers.spawn(run_worker(worker, driver, config, counters, shutdown));
        }

        let mut first_error: Option<ClickstreamError> = None;
        while let Some(joined) = workers.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => Err(ClickstreamError::Internal(format!("worker 异常退出: {e}"))),
            };

            if let Err(e) = result
                && first_error.is_none()
            {
                error!(error = %e, "点击流生成失败，终止所有 worker");
                workers.abort_all();
                first_error = Some(e);
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let stats = RunStats {
            sessions: counters.completed.load(Ordering::Relaxed),
            clicks: counters.clicks.load(Ordering::Relaxed),
            checkouts: counters.checkouts.load(Ordering::Relaxed),
            elapsed: started.elapsed(),
        };

        info!(
            sessions = stats.sessions,
            clicks = stats.clicks,
            checkouts = stats.checkouts,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            events_per_second = format!("{:.1}", stats.events_per_second()),
            "点击流生成完成"
        );
        Ok(stats)
    }
}

async fn run_worker(
    worker: usize,
    driver: SessionDriver,
    config: GeneratorConfig,
    counters: Arc<Counters>,
    shutdown: watch::Receiver<bool>,
) -> Result<(), ClickstreamError> {
    let mut random = RngSource::for_worker(config.rng_seed, worker);

    loop {
        if *shutdown.borrow() {
            warn!(worker, "收到关闭信号，worker 停止领取会话");
            return Ok(());
        }

        // 先领取编号再执行，保证总会话数不超过配置
        let index = counters.claimed.fetch_add(1, Ordering::Relaxed);
        if index >= config.sessions {
            return Ok(());
        }

        let outcome = driver
            .run_session(config.user_pool_size, &mut random)
            .await?;

        counters.clicks.fetch_add(outcome.clicks, Ordering::Relaxed);
        counters.checkouts.fetch_add(outcome.checkouts, Ordering::Relaxed);
        record_session(outcome.events());

        let completed = counters.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if completed % config.progress_every == 0 {
            info!(
                completed,
                total = config.sessions,
                clicks = counters.clicks.load(Ordering::Relaxed),
                checkouts = counters.checkouts.load(Ordering::Relaxed),
                "点击流生成进度"
            );
        }
    }
}
