//! 事件工厂
//!
//! 根据用户/商品身份加上假数据提供者生成完整的点击和结账事件。

use std::sync::Arc;

use uuid::Uuid;

use crate::generators::FakeValues;
use crate::models::timestamp;
use crate::models::{CheckoutEvent, ClickEvent};

/// 点击价格的整数位数上限
pub const CLICK_PRICE_DIGITS: u32 = 2;
/// 结账总额的整数位数上限
pub const CHECKOUT_AMOUNT_DIGITS: u32 = 3;

/// 事件工厂
///
/// 自身不持有状态，所有随机字段都委托给注入的 `FakeValues`。
#[derive(Clone)]
pub struct EventFactory {
    values: Arc<dyn FakeValues>,
}

impl EventFactory {
    pub fn new(values: Arc<dyn FakeValues>) -> Self {
        Self { values }
    }

    /// 生成点击事件
    ///
    /// `product_id` 为空时生成新的商品 ID（会话的锚点商品）。
    pub fn make_click(&self, user_id: u32, product_id: Option<Uuid>) -> ClickEvent {
        ClickEvent {
            click_id: Uuid::new_v4(),
            user_id,
            product_id: product_id.unwrap_or_else(Uuid::new_v4),
            product_name: self.values.product_name(),
            price: self.values.amount(CLICK_PRICE_DIGITS),
            url: self.values.url(),
            user_agent: self.values.user_agent(),
            ip_address: self.values.ipv4(),
            occurred_at: timestamp::now_millis(),
        }
    }

    /// 生成结账事件，`product_id` 来自触发它的点击
    pub fn make_checkout(&self, user_id: u32, product_id: Uuid) -> CheckoutEvent {
        CheckoutEvent {
            checkout_id: Uuid::new_v4(),
            user_id,
            product_id,
            payment_method: self.values.payment_method(),
            total_amount: self.values.amount(CHECKOUT_AMOUNT_DIGITS),
            shipping_address: self.values.address(),
            billing_address: self.values.address(),
            user_agent: self.values.user_agent(),
            ip_address: self.values.ipv4(),
            occurred_at: timestamp::now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{FakerValues, FixedValues};
    use crate::models::Money;
    use std::collections::HashSet;

    fn faker_factory() -> EventFactory {
        EventFactory::new(Arc::new(FakerValues))
    }

    #[test]
    fn test_click_mints_product_when_missing() {
        let factory = faker_factory();
        let first = factory.make_click(3, None);
        let second = factory.make_click(3, None);

        assert_eq!(first.user_id, 3);
        assert_ne!(first.product_id, second.product_id);
        assert_ne!(first.click_id, second.click_id);
    }

    #[test]
    fn test_click_reuses_given_product() {
        let factory = faker_factory();
        let anchor = factory.make_click(9, None);
        let follow_up = factory.make_click(9, Some(anchor.product_id));

        assert_eq!(follow_up.product_id, anchor.product_id);
        assert_ne!(follow_up.click_id, anchor.click_id);
    }

    #[test]
    fn test_click_ids_unique() {
        let factory = faker_factory();
        let ids: HashSet<Uuid> = (0..500).map(|_| factory.make_click(1, None).click_id).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_amount_digit_limits() {
        let factory = faker_factory();
        for _ in 0..200 {
            let click = factory.make_click(1, None);
            assert!(click.price.cents() >= 1);
            assert!(click.price.integer_digits() <= CLICK_PRICE_DIGITS);

            let checkout = factory.make_checkout(1, click.product_id);
            assert!(checkout.total_amount.cents() >= 1);
            assert!(checkout.total_amount.integer_digits() <= CHECKOUT_AMOUNT_DIGITS);
        }
    }

    #[test]
    fn test_checkout_uses_provider_values() {
        let values = FixedValues {
            amount: Money::from_cents(31_415),
            payment_method: "Discover".to_string(),
            ..Default::default()
        };
        let factory = EventFactory::new(Arc::new(values.clone()));
        let product_id = Uuid::new_v4();
        let checkout = factory.make_checkout(5, product_id);

        assert_eq!(checkout.user_id, 5);
        assert_eq!(checkout.product_id, product_id);
        assert_eq!(checkout.payment_method, "Discover");
        assert_eq!(checkout.total_amount.to_string(), "314.15");
        assert_eq!(checkout.shipping_address, values.address);
        assert_eq!(checkout.ip_address, values.ip_address);
    }

    #[test]
    fn test_occurred_at_format() {
        let re = regex::Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}$").unwrap();
        let factory = faker_factory();
        let click = factory.make_click(1, None);
        let value = serde_json::to_value(&click).unwrap();
        let occurred_at = value["occurred_at"].as_str().unwrap();
        assert!(re.is_match(occurred_at), "格式不符: {occurred_at}");
    }
}
