//! Order pricing: line totals, order totals and free-delivery eligibility.

use serde::{Deserialize, Serialize};

use medimart_core::{DomainResult, ItemId, Money, ValueObject};

/// Orders totalling at least this much ship free unless configured otherwise.
pub const DEFAULT_FREE_DELIVERY_THRESHOLD: i64 = 10_000;

/// Order line: catalog item, captured name and unit price, quantity.
///
/// Name and price are snapshots taken when the item entered the cart; they
/// are never re-read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl ValueObject for OrderLine {}

pub fn line_total(line: &OrderLine) -> Money {
    line.unit_price.times(line.quantity)
}

pub fn order_total(lines: &[OrderLine]) -> Money {
    lines.iter().map(line_total).sum()
}

/// Like [`order_total`], but an amount outside the decimal range is an error
/// instead of being clamped.
pub fn checked_order_total(lines: &[OrderLine]) -> DomainResult<Money> {
    lines.iter().try_fold(Money::ZERO, |total, line| {
        total.checked_add(line.unit_price.checked_times(line.quantity)?)
    })
}

/// Configured pricing rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub free_delivery_threshold: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_delivery_threshold: Money::from_units(DEFAULT_FREE_DELIVERY_THRESHOLD),
        }
    }
}

impl PricingPolicy {
    pub fn new(free_delivery_threshold: Money) -> Self {
        Self {
            free_delivery_threshold,
        }
    }

    pub fn is_free_delivery_eligible(&self, total: Money) -> bool {
        total >= self.free_delivery_threshold
    }

    /// How much more a non-empty cart needs to qualify; zero once eligible
    /// or while the cart is empty.
    pub fn amount_to_free_delivery(&self, total: Money) -> Money {
        if total.is_zero() {
            return Money::ZERO;
        }
        self.free_delivery_threshold.saturating_sub(total)
    }
}
