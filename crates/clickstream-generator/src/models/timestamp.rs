//! 事件时间戳
//!
//! `occurred_at` 使用本地墙钟时间，截断到毫秒，文本格式固定为
//! `YYYY-MM-DD HH:MM:SS.mmm`。本模块同时作为 `#[serde(with = "...")]` 使用。

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

/// chrono 格式串，`%.3f` 恰好输出三位毫秒
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// 当前本地时间，截断到毫秒精度
pub fn now_millis() -> NaiveDateTime {
    truncate_to_millis(Local::now().naive_local())
}

/// 丢弃毫秒以下的部分
pub fn truncate_to_millis(value: NaiveDateTime) -> NaiveDateTime {
    let nanos = value.nanosecond() / 1_000_000 * 1_000_000;
    value.with_nanosecond(nanos).unwrap_or(value)
}

pub fn format(value: &NaiveDateTime) -> String {
    value.format(FORMAT).to_string()
}

pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(FORMAT))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
}
