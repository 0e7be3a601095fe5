//! 种子数据加载
//!
//! 在点击流开始之前，向关系库写入 `1..=user_pool_size` 的用户和商品，
//! 并对约 11% 的记录做一次改名，模拟上游的变更数据。

mod loader;
mod store;

pub use loader::{MUTATION_THRESHOLD, SeedLoader, SeedReport};
pub use store::{MemorySeedStore, PgSeedStore, SeedStore};
