//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::{ClickstreamError, Result};

/// 数据库配置
///
/// `url` 为空表示未配置种子数据库，此时只能以跳过种子数据的方式运行。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        }
    }
}

/// Kafka 配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KafkaConfig {
    pub brokers: String,
    pub client_id: String,
    /// 单条消息在本地队列中等待投递的最长时间
    pub message_timeout_ms: u64,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "kafka:9092".to_string(),
            client_id: "clickstream-gen".to_string(),
            message_timeout_ms: 5000,
        }
    }
}

/// 点击流生成参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// 用户池大小，会话从 `[1, user_pool_size]` 中均匀挑选用户
    pub user_pool_size: u32,
    /// 模拟会话总数
    pub sessions: u64,
    /// 并行执行会话的 worker 数量，1 表示严格串行
    pub workers: usize,
    /// 随机数种子，未设置时使用系统熵源
    pub rng_seed: Option<u64>,
    /// 每完成多少个会话输出一次进度日志
    pub progress_every: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            user_pool_size: 100,
            sessions: 100_000_000,
            workers: 1,
            rng_seed: None,
            progress_every: 10_000,
        }
    }
}

impl GeneratorConfig {
    /// 在产生任何事件之前校验参数
    pub fn validate(&self) -> Result<()> {
        if self.user_pool_size == 0 {
            return Err(ClickstreamError::invalid_argument(
                "user_pool_size",
                "用户池大小必须大于 0",
            ));
        }
        if self.sessions == 0 {
            return Err(ClickstreamError::invalid_argument(
                "sessions",
                "会话数量必须大于 0",
            ));
        }
        if self.workers == 0 {
            return Err(ClickstreamError::invalid_argument(
                "workers",
                "worker 数量必须大于 0",
            ));
        }
        if self.progress_every == 0 {
            return Err(ClickstreamError::invalid_argument(
                "progress_every",
                "进度日志间隔必须大于 0",
            ));
        }
        Ok(())
    }
}

/// 发送重试配置（毫秒为单位，便于写入 TOML 和环境变量）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            multiplier: 2.0,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 是否输出 JSON 格式的结构化日志
    pub json_logs: bool,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_port: 9090,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub kafka: KafkaConfig,
    pub database: DatabaseConfig,
    pub generator: GeneratorConfig,
    pub retry: RetryConfig,
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "clickstream-gen".to_string(),
            environment: "development".to_string(),
            kafka: KafkaConfig::default(),
            database: DatabaseConfig::default(),
            generator: GeneratorConfig::default(),
            retry: RetryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. .env 文件（若存在）
    /// 2. {config_dir}/default.toml
    /// 3. {config_dir}/{environment}.toml
    /// 4. {config_dir}/{service_name}.toml
    /// 5. 环境变量（CLICKSTREAM_ 前缀，层级用双下划线，如 CLICKSTREAM_KAFKA__BROKERS -> kafka.brokers）
    ///
    /// 所有文件都是可选的，缺失的字段回落到默认值。
    pub fn load(service_name: &str, config_dir: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let env = std::env::var("CLICKSTREAM_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = config_dir
            .map(str::to_string)
            .or_else(|| std::env::var("CONFIG_DIR").ok())
            .unwrap_or_else(|| "config".to_string());

        let config = Self::builder(service_name, &env, Path::new(&config_dir))?
            .add_source(
                Environment::with_prefix("CLICKSTREAM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    fn builder(
        service_name: &str,
        env: &str,
        config_dir: &Path,
    ) -> std::result::Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError>
    {
        Ok(Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{env}.toml"))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{service_name}.toml"))).required(false),
            ))
    }
}
