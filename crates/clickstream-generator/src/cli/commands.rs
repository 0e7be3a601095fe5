//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。
//! 未显式传入的参数回落到配置文件/环境变量中的值。

use clap::{Args, Parser, Subcommand};

/// 点击流生成工具
///
/// 向关系库写入种子用户/商品，然后持续向 Kafka 的 clicks、checkouts topic
/// 发送模拟的点击和结账事件。
#[derive(Parser, Debug)]
#[command(name = "clickstream-gen")]
#[command(version, about = "电商点击流模拟数据生成工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，默认取配置文件
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Kafka brokers 地址，默认取配置文件
    #[arg(long, global = true, env = "KAFKA_BROKERS")]
    pub kafka_brokers: Option<String>,

    /// 配置文件目录
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 写入种子数据后生成点击流
    Run {
        /// 种子用户/商品数量，同时作为会话挑选用户的范围（默认 100）
        #[arg(short = 'u', long)]
        num_user_records: Option<u32>,

        #[command(flatten)]
        stream: StreamArgs,

        /// 跳过种子数据写入（不需要数据库）
        #[arg(long)]
        skip_seed: bool,
    },

    /// 只写入种子数据
    Seed {
        /// 种子用户/商品数量（默认 100）
        #[arg(short = 'u', long)]
        num_user_records: Option<u32>,
    },

    /// 只生成点击流，假定种子数据已存在
    Stream {
        /// 用户池大小，应与已写入的种子用户数量一致（默认 100）
        #[arg(short = 'u', long)]
        user_pool_size: Option<u32>,

        #[command(flatten)]
        stream: StreamArgs,
    },
}

/// 点击流相关参数
#[derive(Args, Debug, Clone, Default)]
pub struct StreamArgs {
    /// 模拟会话数量（默认 100000000）
    #[arg(short = 'c', long)]
    pub num_click_records: Option<u64>,

    /// 并行 worker 数量（默认 1，严格串行）
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// 随机数种子
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// 输出到标准输出而不是 Kafka
    #[arg(long)]
    pub dry_run: bool,
}

// ============================================================================
// 单元测试
// ============================================================================
