//! 点击流事件模型
//!
//! 字段名与下游消费方约定一致，序列化后不允许多出或缺少字段。

use std::fmt;

use chrono::NaiveDateTime;
use clickstream_shared::kafka::topics;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;
use super::timestamp;

/// 事件投递的逻辑目的地
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Clicks,
    Checkouts,
}

impl Channel {
    /// 对应的 Kafka topic 名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clicks => topics::CLICKS,
            Self::Checkouts => topics::CHECKOUTS,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 商品点击事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClickEvent {
    pub click_id: Uuid,
    pub user_id: u32,
    pub product_id: Uuid,
    pub product_name: String,
    /// 最多两位整数
    pub price: Money,
    pub url: String,
    pub user_agent: String,
    pub ip_address: String,
    #[serde(with = "timestamp")]
    pub occurred_at: NaiveDateTime,
}

/// 结账事件，总是跟随同一会话中的一次点击
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutEvent {
    pub checkout_id: Uuid,
    pub user_id: u32,
    pub product_id: Uuid,
    pub payment_method: String,
    /// 最多三位整数
    pub total_amount: Money,
    pub shipping_address: String,
    pub billing_address: String,
    pub user_agent: String,
    pub ip_address: String,
    #[serde(with = "timestamp")]
    pub occurred_at: NaiveDateTime,
}

/// 交给 sink 的记录
///
/// 序列化时不带类型标签，输出与内部事件完全相同的 JSON 对象。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventRecord {
    Click(ClickEvent),
    Checkout(CheckoutEvent),
}

impl EventRecord {
    /// 消息 key：事件自身的唯一 ID
    pub fn key(&self) -> Uuid {
        match self {
            Self::Click(click) => click.click_id,
            Self::Checkout(checkout) => checkout.checkout_id,
        }
    }

    pub fn user_id(&self) -> u32 {
        match self {
            Self::Click(click) => click.user_id,
            Self::Checkout(checkout) => checkout.user_id,
        }
    }

    pub fn product_id(&self) -> Uuid {
        match self {
            Self::Click(click) => click.product_id,
            Self::Checkout(checkout) => checkout.product_id,
        }
    }

    /// 该记录按约定应当进入的 channel
    pub fn channel(&self) -> Channel {
        match self {
            Self::Click(_) => Channel::Clicks,
            Self::Checkout(_) => Channel::Checkouts,
        }
    }

    pub fn as_click(&self) -> Option<&ClickEvent> {
        match self {
            Self::Click(click) => Some(click),
            Self::Checkout(_) => None,
        }
    }

    pub fn as_checkout(&self) -> Option<&CheckoutEvent> {
        match self {
            Self::Checkout(checkout) => Some(checkout),
            Self::Click(_) => None,
        }
    }
}

impl From<ClickEvent> for EventRecord {
    fn from(click: ClickEvent) -> Self {
        Self::Click(click)
    }
}

impl From<CheckoutEvent> for EventRecord {
    fn from(checkout: CheckoutEvent) -> Self {
        Self::Checkout(checkout)
    }
}
