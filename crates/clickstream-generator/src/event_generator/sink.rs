//! 记录投递
//!
//! `RecordSink` 把一条已生成的记录交给指定 channel。Kafka 实现在整个运行期间
//! 复用同一个生产者，每次发送带指数退避重试，重试耗尽即视为致命错误。

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use clickstream_shared::config::KafkaConfig;
use clickstream_shared::error::ClickstreamError;
use clickstream_shared::kafka::KafkaProducer;
use clickstream_shared::observability::metrics::record_event_sent;
use clickstream_shared::retry::{RetryPolicy, retry_with_policy};
use parking_lot::Mutex;
use tracing::debug;

use crate::models::{Channel, EventRecord};

/// 关闭时等待本地缓冲区清空的上限
const FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// 记录投递能力
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// 序列化记录并投递到 `channel`，返回前等待传输层确认
    async fn send(&self, record: &EventRecord, channel: Channel) -> Result<(), ClickstreamError>;

    /// 运行结束时释放连接；默认无操作
    async fn close(&self) -> Result<(), ClickstreamError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// KafkaSink
// ---------------------------------------------------------------------------

/// 投递到 Kafka 的 sink
#[derive(Clone)]
pub struct KafkaSink {
    producer: KafkaProducer,
    retry: RetryPolicy,
}

impl KafkaSink {
    pub fn new(producer: KafkaProducer, retry: RetryPolicy) -> Self {
        Self { producer, retry }
    }

    /// 根据配置创建生产者并包装为 sink
    pub fn connect(config: &KafkaConfig, retry: RetryPolicy) -> Result<Self, ClickstreamError> {
        Ok(Self::new(KafkaProducer::new(config)?, retry))
    }
}

#[async_trait]
impl RecordSink for KafkaSink {
    async fn send(&self, record: &EventRecord, channel: Channel) -> Result<(), ClickstreamError> {
        let topic = channel.as_str();
        let key = record.key().to_string();
        let key = key.as_str();
        // 序列化只做一次，重试时复用同一份负载
        let payload = serde_json::to_vec(record)?;
        let payload = payload.as_slice();

        retry_with_policy(&self.retry, "kafka_send", || {
            self.producer.send(topic, key, payload)
        })
        .await?;

        record_event_sent(topic);
        Ok(())
    }

    async fn close(&self) -> Result<(), ClickstreamError> {
        self.producer.flush(FLUSH_TIMEOUT)
    }
}

// ---------------------------------------------------------------------------
// StdoutSink
// ---------------------------------------------------------------------------

/// 演练模式：每条记录输出一行 `<channel>\t<json>` 到标准输出
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// 把一条记录按 `<channel>\t<json>\n` 写入 `writer`
    pub fn write_line<W: Write>(
        writer: &mut W,
        record: &EventRecord,
        channel: Channel,
    ) -> Result<(), ClickstreamError> {
        let json = serde_json::to_string(record)?;
        writeln!(writer, "{channel}\t{json}")
            .map_err(|e| ClickstreamError::Internal(format!("写入标准输出失败: {e}")))
    }
}

#[async_trait]
impl RecordSink for StdoutSink {
    async fn send(&self, record: &EventRecord, channel: Channel) -> Result<(), ClickstreamError> {
        Self::write_line(&mut std::io::stdout().lock(), record, channel)?;
        record_event_sent(channel.as_str());
        Ok(())
    }

    async fn close(&self) -> Result<(), ClickstreamError> {
        std::io::stdout()
            .flush()
            .map_err(|e| ClickstreamError::Internal(format!("刷新标准输出失败: {e}")))
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// 内存 sink，按投递顺序保存 (channel, record)
///
/// 可配置在第 N 次发送时失败，用于验证传输失败会终止运行。
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Mutex<Vec<(Channel, EventRecord)>>,
    fail_at: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 `attempt` 次发送（从 0 开始）返回不可重试的错误
    pub fn failing_at(attempt: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_at: Some(attempt),
        }
    }

    /// 已投递记录的快照
    pub fn records(&self) -> Vec<(Channel, EventRecord)> {
        self.sent.lock().clone()
    }

    /// 投递到指定 channel 的记录数
    pub fn count(&self, channel: Channel) -> usize {
        self.sent.lock().iter().filter(|(c, _)| *c == channel).count()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn send(&self, record: &EventRecord, channel: Channel) -> Result<(), ClickstreamError> {
        let mut sent = self.sent.lock();
        if self.fail_at == Some(sent.len()) {
            return Err(ClickstreamError::Internal(format!(
                "模拟投递失败: channel={channel} key={}",
                record.key()
            )));
        }
        debug!(channel = %channel, key = %record.key(), "记录已写入内存 sink");
        sent.push((channel, record.clone()));
        Ok(())
    }
}
