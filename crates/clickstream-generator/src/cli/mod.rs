//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `run` - 写入种子数据后持续生成点击流
//! - `seed` - 只写入种子用户/商品
//! - `stream` - 只生成点击流
//!
//! # 使用示例
//!
//! ```bash
//! # 写入 100 个用户后生成 1000 个会话
//! clickstream-gen run -u 100 -c 1000
//!
//! # 不连接 Kafka，直接输出到终端
//! clickstream-gen stream -c 10 --dry-run
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands, StreamArgs};
pub use runner::CommandRunner;
