//! 金额类型
//!
//! 以整数分保存金额，序列化为恰好两位小数的 JSON 数字（如 `12.50`），
//! 避免浮点数在 JSON 中丢失末尾的 0。

use std::fmt;

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

/// 以分为单位的正金额
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub const fn cents(&self) -> u64 {
        self.cents
    }

    /// 整数部分的位数（0.xx 记为 1 位）
    pub fn integer_digits(&self) -> u32 {
        let whole = self.cents / 100;
        if whole == 0 { 1 } else { whole.ilog10() + 1 }
    }

    /// 给定整数位数上限时可表示的最大分值，例如 2 位对应 99.99
    pub fn max_cents_for_digits(integer_digits: u32) -> u64 {
        10u64.pow(integer_digits + 2) - 1
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // RawValue 让 serde_json 原样输出 "12.50"，而不是 f64 的 "12.5"
        let raw = RawValue::from_string(self.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() || value < 0.0 {
            return Err(D::Error::custom(format!("金额必须为非负数: {value}")));
        }
        Ok(Self::from_cents((value * 100.0).round() as u64))
    }
}
