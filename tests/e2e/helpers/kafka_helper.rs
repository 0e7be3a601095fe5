//! Kafka 辅助工具
//!
//! 提供消息消费功能，以及记录已投递事件 key 的 sink 包装，
//! 用于从 topic 中找回本次测试写入的消息。

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use clickstream_generator::event_generator::RecordSink;
use clickstream_generator::models::{Channel, EventRecord};
use clickstream_shared::error::ClickstreamError;
use rdkafka::Message;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use tokio_stream::StreamExt;
use uuid::Uuid;

/// 从 topic 中读到的一条消息
#[derive(Debug, Clone)]
pub struct ConsumedMessage {
    pub topic: String,
    pub key: String,
    pub payload: serde_json::Value,
}

/// Kafka 辅助工具
pub struct KafkaHelper {
    brokers: String,
}

impl KafkaHelper {
    pub fn new(brokers: &str) -> Self {
        Self {
            brokers: brokers.to_string(),
        }
    }

    /// 从头消费 `topics`，直到读到 `keys` 中所有 key 或超时
    ///
    /// 只返回 key 属于 `keys` 的消息，其它测试或先前运行写入的消息被忽略。
    pub async fn consume_keys(
        &self,
        topics: &[&str],
        keys: &HashSet<String>,
        timeout: Duration,
    ) -> Result<Vec<ConsumedMessage>> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", format!("clickstream-e2e-{}", Uuid::new_v4()))
            .set("enable.partition.eof", "false")
            .set("auto.offset.reset", "earliest")
            .create()?;

        consumer.subscribe(topics)?;

        let mut messages = Vec::new();
        let mut stream = consumer.stream();
        let deadline = tokio::time::Instant::now() + timeout;

        while messages.len() < keys.len() {
            tokio::select! {
                msg = stream.next() => {
                    let Some(Ok(m)) = msg else { break };
                    let key = m
                        .key()
                        .map(|k| String::from_utf8_lossy(k).into_owned())
                        .unwrap_or_default();
                    if !keys.contains(&key) {
                        continue;
                    }
                    if let Some(payload) = m.payload() {
                        messages.push(ConsumedMessage {
                            topic: m.topic().to_string(),
                            key,
                            payload: serde_json::from_slice(payload)?,
                        });
                    }
                }
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }

        Ok(messages)
    }
}

/// 记录经过的每条事件 key 后转交内部 sink
pub struct RecordingSink {
    inner: Arc<dyn RecordSink>,
    sent: Mutex<Vec<(Channel, String)>>,
}

impl RecordingSink {
    pub fn new(inner: Arc<dyn RecordSink>) -> Self {
        Self {
            inner,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<(Channel, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn keys(&self) -> HashSet<String> {
        self.sent().into_iter().map(|(_, key)| key).collect()
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn send(&self, record: &EventRecord, channel: Channel) -> Result<(), ClickstreamError> {
        self.inner.send(record, channel).await?;
        self.sent
            .lock()
            .unwrap()
            .push((channel, record.key().to_string()));
        Ok(())
    }

    async fn close(&self) -> Result<(), ClickstreamError> {
        self.inner.close().await
    }
}
