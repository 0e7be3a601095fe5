//! 点击流事件生成
//!
//! - `factory`: 由身份和假数据构造点击、结账事件
//! - `sink`: 把记录投递到 channel（Kafka、标准输出、内存）
//! - `session`: 单个会话的随机过程
//! - `stream`: 多会话、多 worker 的运行器

mod factory;
mod session;
mod sink;
mod stream;

pub use factory::{CHECKOUT_AMOUNT_DIGITS, CLICK_PRICE_DIGITS, EventFactory};
pub use session::{CONTINUE_THRESHOLD, DRAW_RANGE, SessionDriver, SessionOutcome, should_continue};
pub use sink::{KafkaSink, MemorySink, RecordSink, StdoutSink};
pub use stream::{RunStats, StreamRunner};
