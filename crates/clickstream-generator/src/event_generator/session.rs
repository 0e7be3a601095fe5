//! 会话驱动
//!
//! 一个会话：挑选用户 → 发送锚点点击 → 反复抽取 `[1,100]`，
//! 抽到 `>= 50` 就再发送一次点击和紧随其后的一次结账，抽到 `< 50` 结束。
//! 每轮继续的概率是 51/100，期望点击数为 `1 + 51/49 ≈ 2.04`。

use std::ops::RangeInclusive;
use std::sync::Arc;

use clickstream_shared::error::ClickstreamError;
use tracing::debug;
use uuid::Uuid;

use super::factory::EventFactory;
use super::sink::RecordSink;
use crate::generators::RandomSource;
use crate::models::{Channel, EventRecord};

/// 继续抽取的取值范围
pub const DRAW_RANGE: RangeInclusive<u32> = 1..=100;
/// 抽取值不小于该阈值时会话继续（50 本身算继续）
pub const CONTINUE_THRESHOLD: u32 = 50;

/// 本轮抽取是否让会话继续
pub fn should_continue(draw: u32) -> bool {
    draw >= CONTINUE_THRESHOLD
}

/// 单个会话的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub user_id: u32,
    /// 锚点商品
    pub product_id: Uuid,
    pub clicks: u64,
    pub checkouts: u64,
}

impl SessionOutcome {
    pub fn events(&self) -> u64 {
        self.clicks + self.checkouts
    }
}

/// 会话驱动
///
/// 可以廉价克隆，多个 worker 共享同一个工厂和 sink。
#[derive(Clone)]
pub struct SessionDriver {
    factory: EventFactory,
    sink: Arc<dyn RecordSink>,
}

impl SessionDriver {
    pub fn new(factory: EventFactory, sink: Arc<dyn RecordSink>) -> Self {
        Self { factory, sink }
    }

    /// 运行一个完整的会话
    ///
    /// 事件按生成顺序逐条投递；任何一次投递失败都会立即返回错误，
    /// 会话中剩余的事件不再生成。
    pub async fn run_session(
        &self,
        user_pool_size: u32,
        random: &mut dyn RandomSource,
    ) -> Result<SessionOutcome, ClickstreamError> {
        if user_pool_size == 0 {
            return Err(ClickstreamError::invalid_argument(
                "user_pool_size",
                "用户池大小必须大于 0",
            ));
        }

        let user_id = random.uniform(1..=user_pool_size);

        let anchor = self.factory.make_click(user_id, None);
        let product_id = anchor.product_id;
        self.emit(anchor.into(), Channel::Clicks).await?;

        let mut outcome = SessionOutcome {
            user_id,
            product_id,
            clicks: 1,
            checkouts: 0,
        };

        while should_continue(random.uniform(DRAW_RANGE)) {
            let click = self.factory.make_click(user_id, Some(product_id));
            self.emit(click.into(), Channel::Clicks).await?;
            outcome.clicks += 1;

            let checkout = self.factory.make_checkout(user_id, product_id);
            self.emit(checkout.into(), Channel::Checkouts).await?;
            outcome.checkouts += 1;
        }

        debug!(
            user_id,
            product_id = %product_id,
            clicks = outcome.clicks,
            checkouts = outcome.checkouts,
            "会话结束"
        );
        Ok(outcome)
    }

    async fn emit(&self, record: EventRecord, channel: Channel) -> Result<(), ClickstreamError> {
        self.sink.send(&record, channel).await
    }
}
