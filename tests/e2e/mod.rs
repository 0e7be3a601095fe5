//! 点击流生成器端到端测试
//!
//! 需要运行中的 Kafka 与 PostgreSQL，默认全部忽略：
//!
//! ```bash
//! KAFKA_BROKERS=localhost:9092 DATABASE_URL=postgres://... cargo test --test e2e -- --ignored
//! ```
//!
//! 测试覆盖：
//! - 事件投递到 clicks / checkouts topic 后的字段集合与格式
//! - 种子数据写入 commerce schema

pub mod helpers;
pub mod suites;
