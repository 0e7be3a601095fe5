//! 种子数据加载器

use std::sync::Arc;
use std::time::Instant;

use clickstream_shared::error::ClickstreamError;
use clickstream_shared::observability::metrics::record_seed_rows;
use clickstream_shared::retry::{RetryPolicy, retry_with_policy};
use tracing::info;

use super::store::SeedStore;
use crate::event_generator::DRAW_RANGE;
use crate::generators::{FakeValues, RandomSource};
use crate::models::{SeedProduct, SeedUser};

/// 抽取值不小于该阈值时对刚写入的记录改名（100 个取值中 11 个）
pub const MUTATION_THRESHOLD: u32 = 90;

/// 加载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub users: u64,
    pub products: u64,
    pub mutated: u64,
}

/// 种子数据加载器
pub struct SeedLoader {
    store: Arc<dyn SeedStore>,
    values: Arc<dyn FakeValues>,
    retry: RetryPolicy,
}

impl SeedLoader {
    pub fn new(store: Arc<dyn SeedStore>, values: Arc<dyn FakeValues>, retry: RetryPolicy) -> Self {
        Self {
            store,
            values,
            retry,
        }
    }

    /// 写入 `1..=user_pool_size` 的用户和商品
    ///
    /// 用户 ID 与会话驱动挑选用户的范围一致。
    pub async fn load(
        &self,
        user_pool_size: u32,
        random: &mut dyn RandomSource,
    ) -> Result<SeedReport, ClickstreamError> {
        if user_pool_size == 0 {
            return Err(ClickstreamError::invalid_argument(
                "user_pool_size",
                "用户池大小必须大于 0",
            ));
        }

        let started = Instant::now();
        info!(user_pool_size, "开始写入种子数据");

        let mut report = SeedReport::default();
        for id in 1..=i64::from(user_pool_size) {
            let user = SeedUser {
                id,
                username: self.values.username(),
                password: self.values.password(),
            };
            let product = SeedProduct {
                id,
                name: self.values.full_name(),
                description: self.values.text(),
                price: self.values.list_price(),
            };

            retry_with_policy(&self.retry, "seed_insert", || {
                self.store.insert_identity(&user, &product)
            })
            .await?;
            report.users += 1;
            report.products += 1;

            if random.uniform(DRAW_RANGE) >= MUTATION_THRESHOLD {
                let username = self.values.username();
                let product_name = self.values.full_name();
                retry_with_policy(&self.retry, "seed_rename", || {
                    self.store.rename_identity(id, &username, &product_name)
                })
                .await?;
                report.mutated += 1;
            }
        }

        record_seed_rows("commerce.users", report.users);
        record_seed_rows("commerce.products", report.products);
        info!(
            users = report.users,
            products = report.products,
            mutated = report.mutated,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "种子数据写入完成"
        );
        Ok(report)
    }
}
