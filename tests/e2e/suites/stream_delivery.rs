//! 点击流投递测试
//!
//! 通过真实 Kafka 运行一批会话，再从 clicks / checkouts topic 读回，
//! 验证 topic 归属、消息 key 和字段集合。

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use clickstream_generator::event_generator::{
    EventFactory, KafkaSink, RecordSink, SessionDriver, StreamRunner,
};
use clickstream_generator::generators::FakerValues;
use clickstream_generator::models::Channel;
use clickstream_shared::config::{GeneratorConfig, KafkaConfig};
use clickstream_shared::kafka::topics;
use clickstream_shared::retry::RetryPolicy;
use regex::Regex;
use tokio::sync::watch;

use crate::helpers::{KafkaHelper, RecordingSink, kafka_brokers};

const CLICK_FIELDS: [&str; 9] = [
    "click_id",
    "user_id",
    "product_id",
    "product_name",
    "price",
    "url",
    "user_agent",
    "ip_address",
    "occurred_at",
];

const CHECKOUT_FIELDS: [&str; 10] = [
    "checkout_id",
    "user_id",
    "product_id",
    "payment_method",
    "total_amount",
    "shipping_address",
    "billing_address",
    "user_agent",
    "ip_address",
    "occurred_at",
];

fn field_names(payload: &serde_json::Value) -> BTreeSet<String> {
    payload
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

#[tokio::test]
#[ignore = "需要运行中的 Kafka"]
async fn test_sessions_land_on_expected_topics() {
    let brokers = kafka_brokers();
    let kafka_config = KafkaConfig {
        brokers: brokers.clone(),
        ..Default::default()
    };
    let kafka = Arc::new(KafkaSink::connect(&kafka_config, RetryPolicy::none()).unwrap());
    let sink = Arc::new(RecordingSink::new(kafka));

    let driver = SessionDriver::new(EventFactory::new(Arc::new(FakerValues)), sink.clone());
    let config = GeneratorConfig {
        user_pool_size: 100,
        sessions: 20,
        workers: 1,
        rng_seed: Some(2024),
        progress_every: 10,
    };
    let runner = StreamRunner::new(driver, config).unwrap();
    let (_tx, rx) = watch::channel(false);

    let stats = runner.run(rx).await.unwrap();
    sink.close().await.unwrap();
    assert_eq!(stats.sessions, 20);

    let sent = sink.sent();
    assert_eq!(sent.len() as u64, stats.events());

    let messages = KafkaHelper::new(&brokers)
        .consume_keys(
            &[topics::CLICKS, topics::CHECKOUTS],
            &sink.keys(),
            Duration::from_secs(30),
        )
        .await
        .unwrap();
    assert_eq!(messages.len(), sent.len(), "部分事件未能从 Kafka 读回");

    let click_fields: BTreeSet<String> = CLICK_FIELDS.iter().map(|f| f.to_string()).collect();
    let checkout_fields: BTreeSet<String> =
        CHECKOUT_FIELDS.iter().map(|f| f.to_string()).collect();
    let occurred_at = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}$").unwrap();

    for message in &messages {
        let (channel, _) = sent
            .iter()
            .find(|(_, key)| *key == message.key)
            .expect("读回未知 key");
        assert_eq!(message.topic, channel.as_str());

        match channel {
            Channel::Clicks => {
                assert_eq!(field_names(&message.payload), click_fields);
                assert_eq!(message.payload["click_id"], message.key.as_str());
                assert!(message.payload["price"].as_f64().unwrap() < 100.0);
            }
            Channel::Checkouts => {
                assert_eq!(field_names(&message.payload), checkout_fields);
                assert_eq!(message.payload["checkout_id"], message.key.as_str());
                assert!(message.payload["total_amount"].as_f64().unwrap() < 1000.0);
            }
        }

        let user_id = message.payload["user_id"].as_u64().unwrap();
        assert!((1..=100).contains(&user_id));
        assert!(occurred_at.is_match(message.payload["occurred_at"].as_str().unwrap()));
    }
}
