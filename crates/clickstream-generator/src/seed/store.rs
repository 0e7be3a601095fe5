//! 种子数据存储
//!
//! `SeedStore` 抽象了种子数据的写入目标；PostgreSQL 实现整个加载过程复用同一个连接池，
//! 内存实现基于 DashMap，用于测试。

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use clickstream_shared::database::Database;
use clickstream_shared::error::ClickstreamError;
use dashmap::DashMap;
use tracing::{debug, info, instrument};

use crate::models::{SeedProduct, SeedUser};

/// 种子数据写入能力
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// 写入同一 id 的用户与商品；已存在时覆盖
    async fn insert_identity(
        &self,
        user: &SeedUser,
        product: &SeedProduct,
    ) -> Result<(), ClickstreamError>;

    /// 修改用户名和商品名
    async fn rename_identity(
        &self,
        id: i64,
        username: &str,
        product_name: &str,
    ) -> Result<(), ClickstreamError>;
}

// ---------------------------------------------------------------------------
// PgSeedStore
// ---------------------------------------------------------------------------

/// 写入 `commerce.users` / `commerce.products` 的 PostgreSQL 存储
#[derive(Clone)]
pub struct PgSeedStore {
    db: Database,
}

impl PgSeedStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 创建 `commerce` schema 和两张表（已存在则跳过）
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), ClickstreamError> {
        let statements = [
            "CREATE SCHEMA IF NOT EXISTS commerce",
            "CREATE TABLE IF NOT EXISTS commerce.users (
                id BIGINT PRIMARY KEY,
                username VARCHAR(255),
                password VARCHAR(255)
            )",
            "CREATE TABLE IF NOT EXISTS commerce.products (
                id BIGINT PRIMARY KEY,
                name VARCHAR(255),
                description TEXT,
                price INT
            )",
        ];

        for statement in statements {
            sqlx::query(statement).execute(self.db.pool()).await?;
        }

        info!("commerce schema 已就绪");
        Ok(())
    }
}

#[async_trait]
impl SeedStore for PgSeedStore {
    async fn insert_identity(
        &self,
        user: &SeedUser,
        product: &SeedProduct,
    ) -> Result<(), ClickstreamError> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO commerce.users (id, username, password)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET username = EXCLUDED.username, password = EXCLUDED.password
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO commerce.products (id, name, description, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                description = EXCLUDED.description,
                price = EXCLUDED.price
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(id = user.id, "种子用户和商品已写入");
        Ok(())
    }

    async fn rename_identity(
        &self,
        id: i64,
        username: &str,
        product_name: &str,
    ) -> Result<(), ClickstreamError> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("UPDATE commerce.users SET username = $1 WHERE id = $2")
            .bind(username)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE commerce.products SET name = $1 WHERE id = $2")
            .bind(product_name)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(id, "种子用户和商品已改名");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySeedStore
// ---------------------------------------------------------------------------

/// 内存种子存储
#[derive(Debug, Default)]
pub struct MemorySeedStore {
    users: DashMap<i64, SeedUser>,
    products: DashMap<i64, SeedProduct>,
    renames: AtomicU64,
}

impl MemorySeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, id: i64) -> Option<SeedUser> {
        self.users.get(&id).map(|u| u.clone())
    }

    pub fn product(&self, id: i64) -> Option<SeedProduct> {
        self.products.get(&id).map(|p| p.clone())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// 已执行的改名次数
    pub fn renames(&self) -> u64 {
        self.renames.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SeedStore for MemorySeedStore {
    async fn insert_identity(
        &self,
        user: &SeedUser,
        product: &SeedProduct,
    ) -> Result<(), ClickstreamError> {
        self.users.insert(user.id, user.clone());
        self.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn rename_identity(
        &self,
        id: i64,
        username: &str,
        product_name: &str,
    ) -> Result<(), ClickstreamError> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.username = username.to_string();
        }
        if let Some(mut product) = self.products.get_mut(&id) {
            product.name = product_name.to_string();
        }
        self.renames.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: i64) -> (SeedUser, SeedProduct) {
        (
            SeedUser {
                id,
                username: format!("user{id}"),
                password: "secret".to_string(),
            },
            SeedProduct {
                id,
                name: format!("product{id}"),
                description: "desc".to_string(),
                price: 10,
            },
        )
    }

    #[tokio::test]
    async fn test_memory_store_insert_and_rename() {
        let store = MemorySeedStore::new();
        let (user, product) = identity(1);
        store.insert_identity(&user, &product).await.unwrap();

        store.rename_identity(1, "renamed", "Renamed Product").await.unwrap();

        assert_eq!(store.user(1).unwrap().username, "renamed");
        assert_eq!(store.product(1).unwrap().name, "Renamed Product");
        assert_eq!(store.product(1).unwrap().price, 10);
        assert_eq!(store.renames(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_insert_overwrites() {
        let store = MemorySeedStore::new();
        let (user, product) = identity(2);
        store.insert_identity(&user, &product).await.unwrap();
        store.insert_identity(&user, &product).await.unwrap();

        assert_eq!(store.user_count(), 1);
        assert_eq!(store.product_count(), 1);
    }
}
