//! Clickstream Generator CLI
//!
//! 加载配置、初始化日志与指标，然后分派到各子命令。

use clap::Parser;
use clickstream_generator::cli::{Cli, CommandRunner, Commands};
use clickstream_shared::config::AppConfig;
use clickstream_shared::observability;

const SERVICE_NAME: &str = "clickstream-gen";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(SERVICE_NAME, cli.config_dir.as_deref())?;
    // 命令行参数优先于配置文件和环境变量
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if let Some(brokers) = cli.kafka_brokers {
        config.kafka.brokers = brokers;
    }

    let _guard = observability::init(SERVICE_NAME, &config.observability).await?;

    let runner = CommandRunner::new(config);

    match cli.command {
        Commands::Run {
            num_user_records,
            stream,
            skip_seed,
        } => {
            runner.run_all(num_user_records, &stream, skip_seed).await?;
        }
        Commands::Seed { num_user_records } => {
            runner.run_seed(num_user_records).await?;
        }
        Commands::Stream {
            user_pool_size,
            stream,
        } => {
            runner.run_stream(user_pool_size, &stream).await?;
        }
    }

    Ok(())
}
