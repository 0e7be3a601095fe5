//! 数据模型
//!
//! 点击流事件、种子数据记录以及它们共享的字段类型。

mod event;
mod money;
mod seed;
pub mod timestamp;

pub use event::{Channel, CheckoutEvent, ClickEvent, EventRecord};
pub use money::Money;
pub use seed::{SeedProduct, SeedUser};
