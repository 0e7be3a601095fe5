//! 测试套件

mod seed_load;
mod stream_delivery;
