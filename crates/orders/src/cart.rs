//! Customer cart.
//!
//! The cart lives on the customer's side until checkout; it never touches
//! the catalog again after an item has been added.

use serde::{Deserialize, Serialize};

use medimart_catalog::{Catalog, CatalogItem};
use medimart_core::{DomainError, DomainResult, ItemId, Money};

use crate::pricing::{OrderLine, PricingPolicy, order_total};

/// Ordered list of merged lines (one line per catalog item).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<OrderLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines (cart badge count).
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total(&self) -> Money {
        order_total(&self.lines)
    }

    pub fn is_free_delivery_eligible(&self, policy: &PricingPolicy) -> bool {
        policy.is_free_delivery_eligible(self.total())
    }

    pub fn amount_to_free_delivery(&self, policy: &PricingPolicy) -> Money {
        policy.amount_to_free_delivery(self.total())
    }

    /// Add one unit of `item`.
    ///
    /// An item already in the cart gets its quantity incremented; otherwise a
    /// new line snapshots the item's name and wholesale price.
    pub fn add_item(&mut self, item: &CatalogItem) -> DomainResult<()> {
        if !item.is_available() {
            return Err(DomainError::validation(format!(
                "'{}' is out of stock",
                item.name
            )));
        }

        match self.lines.iter_mut().find(|line| line.item_id == item.id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(1).ok_or_else(|| {
                    DomainError::validation(format!("'{}' is already at the maximum quantity", item.name))
                })?;
            }
            None => self.lines.push(OrderLine {
                item_id: item.id,
                name: item.name.clone(),
                unit_price: item.wholesale_price,
                quantity: 1,
            }),
        }
        Ok(())
    }

    /// Look `item_id` up in the catalog and add one unit of it.
    pub fn add_from_catalog(&mut self, catalog: &Catalog, item_id: &ItemId) -> DomainResult<()> {
        let item = catalog.find_item(item_id)?;
        self.add_item(item)
    }

    /// Change a line's quantity by `delta`; a line reaching zero is removed.
    ///
    /// The result is clamped to `0..=u32::MAX`. Unknown items are ignored.
    pub fn update_quantity(&mut self, item_id: &ItemId, delta: i64) {
        let Some(pos) = self.lines.iter().position(|line| line.item_id == *item_id) else {
            return;
        };

        let next = i64::from(self.lines[pos].quantity)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        if next == 0 {
            self.lines.remove(pos);
        } else {
            self.lines[pos].quantity = next as u32;
        }
    }

    pub fn remove_line(&mut self, item_id: &ItemId) {
        self.lines.retain(|line| line.item_id != *item_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Hand the lines over to checkout, leaving the cart empty.
    pub fn take_lines(&mut self) -> Vec<OrderLine> {
        std::mem::take(&mut self.lines)
    }
}
