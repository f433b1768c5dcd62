use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use medimart_core::{DomainError, DomainResult, ItemId, Money};

/// Stock at or above this quantity is shown as plainly "in stock".
pub const LOW_STOCK_THRESHOLD: u32 = 50;

/// A stocked medicine batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub batch_number: String,
    pub mfg_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub stock_quantity: u32,
    /// Price customers are charged per unit (wholesale storefront).
    pub wholesale_price: Money,
    pub retail_price: Money,
}

impl CatalogItem {
    pub fn is_available(&self) -> bool {
        self.stock_quantity > 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity < LOW_STOCK_THRESHOLD
    }

    /// Check the field-level rules every stored item must satisfy.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if !self.wholesale_price.is_positive() {
            return Err(DomainError::validation("wholesale price must be positive"));
        }
        if !self.retail_price.is_positive() {
            return Err(DomainError::validation("retail price must be positive"));
        }
        if self.expiry_date < self.mfg_date {
            return Err(DomainError::validation(
                "expiry date cannot precede manufacture date",
            ));
        }
        Ok(())
    }
}
