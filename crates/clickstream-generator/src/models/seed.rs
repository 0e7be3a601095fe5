//! 种子数据记录
//!
//! 对应 `commerce.users` 与 `commerce.products` 两张表的一行。

use serde::{Deserialize, Serialize};

/// 种子用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedUser {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// 种子商品，`price` 为 1-100 的整数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedProduct {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i32,
}
