//! 假数据提供者
//!
//! 事件工厂和种子加载器需要的所有“看起来真实”的字段值都从 `FakeValues` 获取。
//! 提供者不持有状态，每次调用相互独立，不保证同一用户多次调用结果一致。

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::internet::en::{DomainSuffix, IPv4, Password, UserAgent, Username};
use fake::faker::lorem::en::{Paragraph, Word};
use fake::faker::name::en::Name;
use rand::Rng;

use crate::models::Money;

/// 信用卡发卡机构，用作结账事件的支付方式
pub const PAYMENT_METHODS: [&str; 10] = [
    "VISA 16 digit",
    "VISA 13 digit",
    "VISA 19 digit",
    "Mastercard",
    "American Express",
    "Discover",
    "Diners Club / Carte Blanche",
    "JCB 15 digit",
    "JCB 16 digit",
    "Maestro",
];

/// 假数据提供能力
pub trait FakeValues: Send + Sync {
    /// 单个英文单词作为商品名
    fn product_name(&self) -> String;

    /// 正金额，两位小数，整数部分不超过 `integer_digits` 位
    fn amount(&self, integer_digits: u32) -> Money;

    fn url(&self) -> String;

    fn user_agent(&self) -> String;

    fn ipv4(&self) -> String;

    fn payment_method(&self) -> String;

    /// 多行邮寄地址
    fn address(&self) -> String;

    fn username(&self) -> String;

    fn password(&self) -> String;

    /// 人名，种子商品沿用它作为商品名
    fn full_name(&self) -> String;

    /// 一段描述文本
    fn text(&self) -> String;

    /// 种子商品价格，1-100 的整数
    fn list_price(&self) -> i32;
}

/// 基于 fake crate 的提供者
#[derive(Debug, Clone, Copy, Default)]
pub struct FakerValues;

impl FakeValues for FakerValues {
    fn product_name(&self) -> String {
        Word().fake()
    }

    fn amount(&self, integer_digits: u32) -> Money {
        let max = Money::max_cents_for_digits(integer_digits);
        Money::from_cents(rand::rng().random_range(1..=max))
    }

    fn url(&self) -> String {
        let host: String = Word().fake();
        let suffix: String = DomainSuffix().fake();
        format!("https://www.{}.{}/", host.to_lowercase(), suffix)
    }

    fn user_agent(&self) -> String {
        UserAgent().fake()
    }

    fn ipv4(&self) -> String {
        IPv4().fake()
    }

    fn payment_method(&self) -> String {
        let index = rand::rng().random_range(0..PAYMENT_METHODS.len());
        PAYMENT_METHODS[index].to_string()
    }

    fn address(&self) -> String {
        let number: String = BuildingNumber().fake();
        let street: String = StreetName().fake();
        let city: String = CityName().fake();
        let state: String = StateAbbr().fake();
        let zip: String = ZipCode().fake();
        format!("{number} {street}\n{city}, {state} {zip}")
    }

    fn username(&self) -> String {
        Username().fake()
    }

    fn password(&self) -> String {
        Password(10..17).fake()
    }

    fn full_name(&self) -> String {
        Name().fake()
    }

    fn text(&self) -> String {
        Paragraph(1..4).fake()
    }

    fn list_price(&self) -> i32 {
        rand::rng().random_range(1..=100)
    }
}

/// 固定值提供者
///
/// 每个字段返回构造时给定的常量，用于测试和基准测试中排除假数据生成的开销。
#[derive(Debug, Clone)]
pub struct FixedValues {
    pub product_name: String,
    pub amount: Money,
    pub url: String,
    pub user_agent: String,
    pub ip_address: String,
    pub payment_method: String,
    pub address: String,
    pub list_price: i32,
}

impl Default for FixedValues {
    fn default() -> Self {
        Self {
            product_name: "widget".to_string(),
            amount: Money::from_cents(1999),
            url: "https://www.example.com/".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            ip_address: "192.0.2.10".to_string(),
            payment_method: "Mastercard".to_string(),
            address: "1 Infinite Loop\nCupertino, CA 95014".to_string(),
            list_price: 42,
        }
    }
}

impl FakeValues for FixedValues {
    fn product_name(&self) -> String {
        self.product_name.clone()
    }

    fn amount(&self, integer_digits: u32) -> Money {
        let max = Money::max_cents_for_digits(integer_digits);
        Money::from_cents(self.amount.cents().min(max))
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn ipv4(&self) -> String {
        self.ip_address.clone()
    }

    fn payment_method(&self) -> String {
        self.payment_method.clone()
    }

    fn address(&self) -> String {
        self.address.clone()
    }

    fn username(&self) -> String {
        "fixed_user".to_string()
    }

    fn password(&self) -> String {
        "fixed-password".to_string()
    }

    fn full_name(&self) -> String {
        "Fixed Name".to_string()
    }

    fn text(&self) -> String {
        "Fixed description.".to_string()
    }

    fn list_price(&self) -> i32 {
        self.list_price
    }
}
