//! Clickstream Generator
//!
//! 生成模拟电商点击流（点击、结账事件）并投递到 Kafka，供下游流处理管道测试使用。
//!
//! # 主要模块
//!
//! - `models`: 事件与种子数据模型
//! - `generators`: 假数据提供者与随机数来源
//! - `event_generator`: 事件工厂、投递 sink、会话驱动与运行器
//! - `seed`: 种子数据加载
//! - `cli`: 命令行入口
//!
//! # 使用示例
//!
//! ```rust
//! use std::sync::Arc;
//! use clickstream_generator::event_generator::{EventFactory, MemorySink, SessionDriver};
//! use clickstream_generator::generators::{FakerValues, ScriptedSource};
//!
//! # tokio_test::block_on(async {
//! let sink = Arc::new(MemorySink::new());
//! let driver = SessionDriver::new(EventFactory::new(Arc::new(FakerValues)), sink.clone());
//!
//! // 用户池只有 1 人，继续两次后停止
//! let mut random = ScriptedSource::new([50, 99, 49]);
//! let outcome = driver.run_session(1, &mut random).await.unwrap();
//!
//! assert_eq!(outcome.clicks, 3);
//! assert_eq!(outcome.checkouts, 2);
//! assert_eq!(sink.len(), 5);
//! # });
//! ```

pub mod cli;
pub mod event_generator;
pub mod generators;
pub mod models;
pub mod seed;
