use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medimart_auth::{Permission, Principal, authorize};
use medimart_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ItemId};
use medimart_events::Event;

use crate::CatalogItem;

/// Aggregate root: the whole stock list, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    version: u64,
}

/// Staff inventory search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive substring of the item name.
    pub search: Option<String>,
    /// Exact category label; `None` means all categories.
    pub category: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, item: &CatalogItem) -> bool {
        let name_ok = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => item
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| item.category == category);
        name_ok && category_ok
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing item list (e.g. the demo seed).
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        Self { items, version: 0 }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }

    pub fn find_item(&self, id: &ItemId) -> DomainResult<&CatalogItem> {
        self.items
            .iter()
            .find(|item| item.id == *id)
            .ok_or_else(|| DomainError::not_found("catalog item"))
    }

    /// Items customers may order (stock > 0), insertion order.
    pub fn list_available(&self) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.is_available()).collect()
    }

    /// Customer storefront search: available items whose name matches `term`.
    pub fn search_available(&self, term: &str) -> Vec<&CatalogItem> {
        let filter = CatalogFilter {
            search: Some(term.to_string()),
            category: None,
        };
        self.items
            .iter()
            .filter(|item| item.is_available() && filter.matches(item))
            .collect()
    }

    /// Staff search, including out-of-stock items.
    pub fn search(&self, filter: &CatalogFilter) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    pub fn low_stock(&self) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.is_low_stock()).collect()
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == *id)
    }
}

/// Identifier of the single catalog stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct CatalogId;

impl AggregateRoot for Catalog {
    type Id = CatalogId;

    fn id(&self) -> &Self::Id {
        &CatalogId
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: UpsertItem.
///
/// An item whose id is already present replaces it in place; any other id is
/// appended. Callers without an id obtain a fresh one before building this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertItem {
    pub actor: Principal,
    pub item: CatalogItem,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem. Unknown ids are a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub actor: Principal,
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ResetCatalog. Replaces every item with `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetCatalog {
    pub actor: Principal,
    pub items: Vec<CatalogItem>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogCommand {
    UpsertItem(UpsertItem),
    RemoveItem(RemoveItem),
    ResetCatalog(ResetCatalog),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: CatalogItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdated {
    pub item: CatalogItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CatalogReset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReset {
    pub items: Vec<CatalogItem>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogEvent {
    ItemAdded(ItemAdded),
    ItemUpdated(ItemUpdated),
    ItemRemoved(ItemRemoved),
    CatalogReset(CatalogReset),
}

impl Event for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::ItemAdded(_) => "catalog.item.added",
            CatalogEvent::ItemUpdated(_) => "catalog.item.updated",
            CatalogEvent::ItemRemoved(_) => "catalog.item.removed",
            CatalogEvent::CatalogReset(_) => "catalog.reset",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CatalogEvent::ItemAdded(e) => e.occurred_at,
            CatalogEvent::ItemUpdated(e) => e.occurred_at,
            CatalogEvent::ItemRemoved(e) => e.occurred_at,
            CatalogEvent::CatalogReset(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Catalog {
    type Command = CatalogCommand;
    type Event = CatalogEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CatalogEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            CatalogEvent::ItemUpdated(e) => {
                if let Some(pos) = self.position(&e.item.id) {
                    self.items[pos] = e.item.clone();
                }
            }
            CatalogEvent::ItemRemoved(e) => {
                self.items.retain(|item| item.id != e.item_id);
            }
            CatalogEvent::CatalogReset(e) => {
                self.items = e.items.clone();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CatalogCommand::UpsertItem(cmd) => self.handle_upsert(cmd),
            CatalogCommand::RemoveItem(cmd) => self.handle_remove(cmd),
            CatalogCommand::ResetCatalog(cmd) => self.handle_reset(cmd),
        }
    }
}

impl Catalog {
    fn handle_upsert(&self, cmd: &UpsertItem) -> Result<Vec<CatalogEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::CATALOG_WRITE)?;
        cmd.item.validate()?;

        let event = if self.contains(&cmd.item.id) {
            CatalogEvent::ItemUpdated(ItemUpdated {
                item: cmd.item.clone(),
                occurred_at: cmd.occurred_at,
            })
        } else {
            CatalogEvent::ItemAdded(ItemAdded {
                item: cmd.item.clone(),
                occurred_at: cmd.occurred_at,
            })
        };
        Ok(vec![event])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Result<Vec<CatalogEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::CATALOG_DELETE)?;

        if !self.contains(&cmd.item_id) {
            return Ok(vec![]);
        }

        Ok(vec![CatalogEvent::ItemRemoved(ItemRemoved {
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reset(&self, cmd: &ResetCatalog) -> Result<Vec<CatalogEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::CATALOG_RESET)?;
        for item in &cmd.items {
            item.validate()?;
        }

        Ok(vec![CatalogEvent::CatalogReset(CatalogReset {
            items: cmd.items.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::tests::paracetamol;
    use medimart_auth::Role;
    use medimart_core::{Money, UserId};

    fn admin() -> Principal {
        Principal::new(UserId::new(), Role::Admin)
    }

    fn employee() -> Principal {
        Principal::new(UserId::new(), Role::Employee)
    }

    fn upsert(actor: Principal, item: CatalogItem) -> CatalogCommand {
        CatalogCommand::UpsertItem(UpsertItem {
            actor,
            item,
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn upsert_with_new_id_appends() {
        let mut catalog = Catalog::new();
        let item = paracetamol();
        let events = catalog.execute(&upsert(employee(), item.clone())).unwrap();

        assert!(matches!(events[0], CatalogEvent::ItemAdded(_)));
        assert_eq!(catalog.find_item(&item.id).unwrap(), &item);
        assert_eq!(catalog.version(), 1);
    }

    #[test]
    fn upsert_with_existing_id_overwrites_in_place() {
        let first = paracetamol();
        let second = CatalogItem {
            name: "Vitamin C 500mg".to_string(),
            ..paracetamol()
        };
        let mut catalog = Catalog::from_items(vec![first.clone(), second.clone()]);

        let edited = CatalogItem {
            stock_quantity: 7,
            wholesale_price: Money::from_units(13),
            ..first.clone()
        };
        let events = catalog.execute(&upsert(admin(), edited.clone())).unwrap();

        assert!(matches!(events[0], CatalogEvent::ItemUpdated(_)));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0], edited);
        assert_eq!(catalog.items()[1], second);
    }

    #[test]
    fn customers_cannot_edit_catalog() {
        let catalog = Catalog::new();
        let customer = Principal::new(UserId::new(), Role::Customer);
        let err = catalog.handle(&upsert(customer, paracetamol())).unwrap_err();
        assert_eq!(err, DomainError::Unauthorized);
    }

    #[test]
    fn invalid_item_is_rejected() {
        let catalog = Catalog::new();
        let item = CatalogItem {
            retail_price: Money::ZERO,
            ..paracetamol()
        };
        assert!(matches!(
            catalog.handle(&upsert(admin(), item)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn removing_unknown_item_is_a_no_op() {
        let mut catalog = Catalog::from_items(vec![paracetamol()]);
        let events = catalog
            .execute(&CatalogCommand::RemoveItem(RemoveItem {
                actor: admin(),
                item_id: ItemId::new(),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.version(), 0);
    }

    #[test]
    fn only_admin_removes_items() {
        let item = paracetamol();
        let mut catalog = Catalog::from_items(vec![item.clone()]);
        let remove = |actor| {
            CatalogCommand::RemoveItem(RemoveItem {
                actor,
                item_id: item.id,
                occurred_at: Utc::now(),
            })
        };

        assert_eq!(
            catalog.handle(&remove(employee())),
            Err(DomainError::Unauthorized)
        );
        catalog.execute(&remove(admin())).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.find_item(&item.id), Err(DomainError::NotFound("catalog item")));
    }

    #[test]
    fn list_available_skips_out_of_stock_and_keeps_order() {
        let a = paracetamol();
        let b = CatalogItem {
            id: ItemId::new(),
            stock_quantity: 0,
            ..paracetamol()
        };
        let c = CatalogItem {
            id: ItemId::new(),
            name: "Amoxicillin 250mg".to_string(),
            ..paracetamol()
        };
        let catalog = Catalog::from_items(vec![a.clone(), b, c.clone()]);
        assert_eq!(catalog.list_available(), vec![&a, &c]);
    }

    #[test]
    fn filters_by_name_and_category() {
        let a = paracetamol();
        let b = CatalogItem {
            id: ItemId::new(),
            name: "Amoxicillin 250mg".to_string(),
            category: "Antibiotics".to_string(),
            stock_quantity: 0,
            ..paracetamol()
        };
        let catalog = Catalog::from_items(vec![a.clone(), b.clone()]);

        let by_name = CatalogFilter {
            search: Some("AMOX".to_string()),
            category: None,
        };
        assert_eq!(catalog.search(&by_name), vec![&b]);

        let by_category = CatalogFilter {
            search: None,
            category: Some("Analgesics".to_string()),
        };
        assert_eq!(catalog.search(&by_category), vec![&a]);

        assert!(catalog.search_available("amox").is_empty());
        assert_eq!(catalog.search_available("").len(), 1);
    }

    #[test]
    fn reset_replaces_everything() {
        let mut catalog = Catalog::from_items(vec![paracetamol(), paracetamol()]);
        let seed = vec![paracetamol()];
        catalog
            .execute(&CatalogCommand::ResetCatalog(ResetCatalog {
                actor: admin(),
                items: seed.clone(),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        assert_eq!(catalog.items(), seed.as_slice());
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let catalog = Catalog::from_items(vec![paracetamol()]);
        let before = catalog.clone();
        let cmd = upsert(admin(), paracetamol());
        let e1 = catalog.handle(&cmd).unwrap();
        let e2 = catalog.handle(&cmd).unwrap();
        assert_eq!(catalog, before);
        assert_eq!(e1, e2);
    }
}
