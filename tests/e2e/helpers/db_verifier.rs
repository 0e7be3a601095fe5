//! 数据库验证工具
//!
//! 查询 commerce schema 中的种子数据，验证加载结果。

use anyhow::Result;
use sqlx::PgPool;

/// 数据库验证工具
pub struct DbVerifier {
    pool: PgPool,
}

impl DbVerifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// id 落在 `[1, max_id]` 内的用户数量
    pub async fn count_users(&self, max_id: i64) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM commerce.users WHERE id BETWEEN 1 AND $1")
                .bind(max_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    /// id 落在 `[1, max_id]` 内的商品数量
    pub async fn count_products(&self, max_id: i64) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM commerce.products WHERE id BETWEEN 1 AND $1")
                .bind(max_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    /// 价格不在 `[1, 100]` 的商品数量
    pub async fn count_out_of_range_prices(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM commerce.products WHERE price < 1 OR price > 100",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }
}
