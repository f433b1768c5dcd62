use serde::{Deserialize, Serialize};

use medimart_core::Money;

/// Order status lifecycle.
///
/// ```text
/// PENDING ──► ACCEPTED ──► OUT_FOR_DELIVERY ──► DELIVERED
///    │
///    └──────► DECLINED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Declined,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Declined,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Declined | OrderStatus::Delivered)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Accepted)
                | (OrderStatus::Pending, OrderStatus::Declined)
                | (OrderStatus::Accepted, OrderStatus::OutForDelivery)
                | (OrderStatus::OutForDelivery, OrderStatus::Delivered)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Declined => "DECLINED",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery charge of an order: undetermined until staff accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum DeliveryCharge {
    #[default]
    Undetermined,
    Charged(Money),
}

impl DeliveryCharge {
    pub fn amount(&self) -> Option<Money> {
        match self {
            DeliveryCharge::Undetermined => None,
            DeliveryCharge::Charged(amount) => Some(*amount),
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, DeliveryCharge::Charged(amount) if amount.is_zero())
    }
}
