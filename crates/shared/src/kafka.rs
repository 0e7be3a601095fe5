//! Kafka 基础设施封装
//!
//! 将 rdkafka 的 `FutureProducer` 封装为面向业务的生产者，
//! 统一消息序列化、错误映射和关闭前的刷新语义。

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use tracing::{debug, info};

use crate::config::KafkaConfig;
use crate::error::ClickstreamError;

// ---------------------------------------------------------------------------
// Topic 常量
// ---------------------------------------------------------------------------

/// 集中管理所有 Kafka topic 名称，下游流处理作业按这些名称订阅
pub mod topics {
    pub const CLICKS: &str = "clicks";
    pub const CHECKOUTS: &str = "checkouts";
}

// ---------------------------------------------------------------------------
// KafkaProducer
// ---------------------------------------------------------------------------

/// 面向业务的 Kafka 生产者
///
/// 整个运行期间只创建一次，内部已派生 Clone（`FutureProducer` 本身是 Arc 包装的），
/// 多个 worker 共享同一条连接。
#[derive(Clone)]
pub struct KafkaProducer {
    producer: FutureProducer,
    send_timeout: Duration,
}

impl KafkaProducer {
    /// 根据配置创建生产者
    pub fn new(config: &KafkaConfig) -> Result<Self, ClickstreamError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("client.id", &config.client_id)
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .create()
            .map_err(|e| ClickstreamError::Kafka(format!("创建生产者失败: {e}")))?;

        info!(brokers = %config.brokers, client_id = %config.client_id, "Kafka 生产者已初始化");
        Ok(Self {
            producer,
            send_timeout: Duration::from_millis(config.message_timeout_ms),
        })
    }

    /// 发送原始字节消息，等待 broker 确认后返回 (partition, offset)
    pub async fn send(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
    ) -> Result<(i32, i64), ClickstreamError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        // rdkafka 0.39+ 返回 Delivery 结构体而非元组
        let delivery = self
            .producer
            .send(record, self.send_timeout)
            .await
            .map_err(|(e, _)| ClickstreamError::Kafka(format!("发送消息失败: {e}")))?;

        debug!(
            topic,
            key,
            partition = delivery.partition,
            offset = delivery.offset,
            "消息已发送"
        );
        Ok((delivery.partition, delivery.offset))
    }

    /// 刷新本地缓冲区中尚未投递的消息
    ///
    /// 运行结束时调用，确保进程退出前所有已提交的消息都已离开本地队列。
    pub fn flush(&self, timeout: Duration) -> Result<(), ClickstreamError> {
        self.producer
            .flush(timeout)
            .map_err(|e| ClickstreamError::Kafka(format!("刷新生产者失败: {e}")))?;
        info!("Kafka 生产者缓冲区已刷新");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 测试
// ---------------------------------------------------------------------------
