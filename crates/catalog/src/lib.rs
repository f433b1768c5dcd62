//! Catalog domain module.
//!
//! Business rules for the pharmacy's stock list, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod catalog;
pub mod item;
pub mod seed;

pub use catalog::{
    Catalog, CatalogCommand, CatalogEvent, CatalogFilter, CatalogReset, ItemAdded, ItemRemoved,
    ItemUpdated, RemoveItem, ResetCatalog, UpsertItem,
};
pub use item::{CatalogItem, LOW_STOCK_THRESHOLD};
pub use seed::{CATEGORIES, demo_items};
