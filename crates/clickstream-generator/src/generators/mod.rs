//! 生成器基础能力
//!
//! - `fake_values`: 假数据提供者（名称、地址、UA、IP、金额等）
//! - `random`: 可注入的随机数来源，控制会话长度与分支

mod fake_values;
mod random;

pub use fake_values::{FakeValues, FakerValues, FixedValues, PAYMENT_METHODS};
pub use random::{RandomSource, RngSource, ScriptedSource};
