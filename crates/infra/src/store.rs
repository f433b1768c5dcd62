//! Application store.
//!
//! Holds the only copy of catalog, orders and tickets. Every mutation goes
//! through a role-checked operation that:
//!
//! ```text
//! operation(actor, input)
//!   ↓
//! 1. Build the domain command (ids from the IdGenerator, time from the Clock)
//!   ↓
//! 2. Execute it on the aggregate (handle, then apply; nothing on rejection)
//!   ↓
//! 3. Publish each applied event as an envelope on the bus
//! ```
//!
//! Publication failures are logged and do not undo the applied state: the
//! bus only feeds views.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medimart_auth::{Identity, Permission, Principal, authorize};
use medimart_catalog::{
    Catalog, CatalogCommand, CatalogFilter, CatalogItem, RemoveItem, ResetCatalog, UpsertItem,
    demo_items,
};
use medimart_core::{
    Aggregate, AggregateRoot, Clock, IdGenerator, ItemId, Money, OrderId, TicketId,
};
use medimart_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use medimart_orders::{
    AcceptOrder, Cart, DeclineOrder, DeliverySchedule, DispatchOrder, MarkDelivered, Order,
    OrderCommand, PlaceOrder, PricingPolicy,
};
use medimart_support::{OpenTicket, ResolveTicket, Ticket, TicketCommand};

use crate::config::AppConfig;
use crate::error::{StoreError, StoreResult};
use crate::events::{CATALOG_AGGREGATE, ORDER_AGGREGATE, StoreEnvelope, StoreEvent, TICKET_AGGREGATE};
use crate::projections::DashboardStats;

/// Inventory-editor input. `id: None` creates a new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub id: Option<ItemId>,
    pub name: String,
    pub category: String,
    pub batch_number: String,
    pub mfg_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub stock_quantity: u32,
    pub wholesale_price: Money,
    pub retail_price: Money,
}

impl ItemDraft {
    fn into_item(self, id: ItemId) -> CatalogItem {
        CatalogItem {
            id,
            name: self.name.trim().to_string(),
            category: self.category,
            batch_number: self.batch_number,
            mfg_date: self.mfg_date,
            expiry_date: self.expiry_date,
            stock_quantity: self.stock_quantity,
            wholesale_price: self.wholesale_price,
            retail_price: self.retail_price,
        }
    }
}

impl From<&CatalogItem> for ItemDraft {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
            category: item.category.clone(),
            batch_number: item.batch_number.clone(),
            mfg_date: item.mfg_date,
            expiry_date: item.expiry_date,
            stock_quantity: item.stock_quantity,
            wholesale_price: item.wholesale_price,
            retail_price: item.retail_price,
        }
    }
}

pub struct AppStore<B = Arc<InMemoryEventBus<StoreEnvelope>>> {
    catalog: Catalog,
    /// Newest first.
    orders: Vec<Order>,
    /// Newest first.
    tickets: Vec<Ticket>,
    pricing: PricingPolicy,
    default_delivery_charge: Money,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    bus: B,
}

impl<B> AppStore<B>
where
    B: EventBus<StoreEnvelope>,
{
    /// Empty store: no catalog items, orders or tickets.
    pub fn new(config: &AppConfig, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>, bus: B) -> Self {
        Self {
            catalog: Catalog::new(),
            orders: Vec::new(),
            tickets: Vec::new(),
            pricing: config.pricing(),
            default_delivery_charge: config.default_delivery_charge,
            ids,
            clock,
            bus,
        }
    }

    /// Store seeded with the demo catalog.
    pub fn with_demo_catalog(
        config: &AppConfig,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        bus: B,
    ) -> Self {
        let items = demo_items(ids.as_ref());
        let mut store = Self::new(config, ids, clock, bus);
        store.catalog = Catalog::from_items(items);
        store
    }

    pub fn subscribe(&self) -> Subscription<StoreEnvelope> {
        self.bus.subscribe()
    }

    pub fn pricing(&self) -> PricingPolicy {
        self.pricing
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ---- catalog -------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn find_item(&self, id: &ItemId) -> StoreResult<&CatalogItem> {
        Ok(self.catalog.find_item(id)?)
    }

    /// Storefront listing: in-stock items, optionally narrowed by name.
    pub fn list_available(&self, search: Option<&str>) -> Vec<&CatalogItem> {
        match search {
            Some(term) => self.catalog.search_available(term),
            None => self.catalog.list_available(),
        }
    }

    /// Inventory view for staff, including out-of-stock items.
    pub fn search_inventory(
        &self,
        actor: &Principal,
        filter: &CatalogFilter,
    ) -> StoreResult<Vec<&CatalogItem>> {
        authorize(actor, &Permission::CATALOG_WRITE)?;
        Ok(self.catalog.search(filter))
    }

    /// Add or edit an item; returns the id it is stored under.
    pub fn save_item(&mut self, actor: &Principal, draft: ItemDraft) -> StoreResult<ItemId> {
        let id = draft.id.unwrap_or_else(|| self.ids.next_item_id());
        let item = draft.into_item(id);

        self.execute_catalog(CatalogCommand::UpsertItem(UpsertItem {
            actor: *actor,
            item,
            occurred_at: self.clock.now(),
        }))?;

        tracing::info!(item_id = %id, user_id = %actor.user_id, "catalog item saved");
        Ok(id)
    }

    /// Remove an item; unknown ids are a no-op.
    pub fn delete_item(&mut self, actor: &Principal, item_id: ItemId) -> StoreResult<()> {
        let removed = self.execute_catalog(CatalogCommand::RemoveItem(RemoveItem {
            actor: *actor,
            item_id,
            occurred_at: self.clock.now(),
        }))?;

        tracing::info!(item_id = %item_id, removed, "catalog item delete");
        Ok(())
    }

    /// Replace the whole catalog with a fresh copy of the demo items.
    pub fn reset_catalog(&mut self, actor: &Principal) -> StoreResult<()> {
        authorize(actor, &Permission::CATALOG_RESET)?;
        let items = demo_items(self.ids.as_ref());

        self.execute_catalog(CatalogCommand::ResetCatalog(ResetCatalog {
            actor: *actor,
            items,
            occurred_at: self.clock.now(),
        }))?;

        tracing::info!(user_id = %actor.user_id, items = self.catalog.len(), "catalog reset");
        Ok(())
    }

    // ---- orders --------------------------------------------------------

    /// Submit the cart as a new order.
    ///
    /// The cart is emptied only when the order is accepted by the domain;
    /// a rejected submission leaves it as it was.
    pub fn place_order(
        &mut self,
        customer: &Identity,
        cart: &mut Cart,
        address: &str,
        schedule: &DeliverySchedule,
    ) -> StoreResult<&Order> {
        let order_id = self.ids.next_order_id();
        let cmd = OrderCommand::PlaceOrder(PlaceOrder {
            actor: customer.principal(),
            order_id,
            customer: customer.contact(),
            address: address.to_string(),
            region: schedule.region(),
            requested_delivery_date: schedule.requested_date(),
            lines: cart.lines().to_vec(),
            pricing: self.pricing,
            today: self.clock.today(),
            occurred_at: self.clock.now(),
        });

        let mut order = Order::empty(order_id);
        let events = order.execute(&cmd).inspect_err(|e| {
            tracing::debug!(user_id = %customer.id, error = %e, "order rejected");
        })?;
        cart.clear();

        tracing::info!(
            order_id = %order_id,
            user_id = %customer.id,
            total = %order.total_amount(),
            free_delivery = order.is_free_delivery(),
            "order placed"
        );

        self.orders.insert(0, order);
        self.publish(ORDER_AGGREGATE, *order_id.as_uuid(), 0, events);
        Ok(&self.orders[0])
    }

    pub fn accept_order(
        &mut self,
        actor: &Principal,
        order_id: OrderId,
        delivery_charge: Option<Money>,
    ) -> StoreResult<&Order> {
        let cmd = OrderCommand::AcceptOrder(AcceptOrder {
            actor: *actor,
            order_id,
            delivery_charge,
            occurred_at: self.clock.now(),
        });
        self.execute_order(order_id, cmd, "order accepted")
    }

    pub fn decline_order(&mut self, actor: &Principal, order_id: OrderId) -> StoreResult<&Order> {
        let cmd = OrderCommand::DeclineOrder(DeclineOrder {
            actor: *actor,
            order_id,
            occurred_at: self.clock.now(),
        });
        self.execute_order(order_id, cmd, "order declined")
    }

    pub fn dispatch_order(&mut self, actor: &Principal, order_id: OrderId) -> StoreResult<&Order> {
        let cmd = OrderCommand::DispatchOrder(DispatchOrder {
            actor: *actor,
            order_id,
            occurred_at: self.clock.now(),
        });
        self.execute_order(order_id, cmd, "order dispatched")
    }

    pub fn mark_delivered(&mut self, actor: &Principal, order_id: OrderId) -> StoreResult<&Order> {
        let cmd = OrderCommand::MarkDelivered(MarkDelivered {
            actor: *actor,
            order_id,
            occurred_at: self.clock.now(),
        });
        self.execute_order(order_id, cmd, "order delivered")
    }

    /// Charge to pre-fill when staff accept `order_id`; `None` unless pending.
    pub fn suggested_delivery_charge(
        &self,
        actor: &Principal,
        order_id: OrderId,
    ) -> StoreResult<Option<Money>> {
        authorize(actor, &Permission::ORDERS_DECIDE)?;
        let order = self.order(actor, order_id)?;
        Ok(order.suggested_delivery_charge(self.default_delivery_charge))
    }

    /// Orders visible to `actor`, newest first: customers see only their own.
    pub fn orders(&self, actor: &Principal) -> Vec<&Order> {
        let all = actor.role.grants(&Permission::ORDERS_READ_ALL);
        self.orders
            .iter()
            .filter(|order| all || order.is_placed_by(actor))
            .collect()
    }

    /// A single order; someone else's order looks the same as a missing one.
    pub fn order(&self, actor: &Principal, order_id: OrderId) -> StoreResult<&Order> {
        self.orders(actor)
            .into_iter()
            .find(|order| order.id_typed() == order_id)
            .ok_or(StoreError::NotFound)
    }

    // ---- support -------------------------------------------------------

    pub fn open_ticket(
        &mut self,
        customer: &Identity,
        subject: &str,
        message: &str,
    ) -> StoreResult<&Ticket> {
        let ticket_id = self.ids.next_ticket_id();
        let cmd = TicketCommand::OpenTicket(OpenTicket {
            actor: customer.principal(),
            ticket_id,
            customer: customer.contact(),
            subject: subject.to_string(),
            message: message.to_string(),
            occurred_at: self.clock.now(),
        });

        let mut ticket = Ticket::empty(ticket_id);
        let events = ticket.execute(&cmd)?;
        tracing::info!(ticket_id = %ticket_id, user_id = %customer.id, "ticket opened");

        self.tickets.insert(0, ticket);
        self.publish(TICKET_AGGREGATE, *ticket_id.as_uuid(), 0, events);
        Ok(&self.tickets[0])
    }

    pub fn resolve_ticket(
        &mut self,
        actor: &Principal,
        ticket_id: TicketId,
        response: Option<String>,
    ) -> StoreResult<&Ticket> {
        let pos = self
            .tickets
            .iter()
            .position(|t| t.id_typed() == ticket_id)
            .ok_or(StoreError::NotFound)?;

        let cmd = TicketCommand::ResolveTicket(ResolveTicket {
            actor: *actor,
            ticket_id,
            response,
            occurred_at: self.clock.now(),
        });

        let ticket = &mut self.tickets[pos];
        let base = ticket.version();
        let events = ticket.execute(&cmd)?;
        tracing::info!(ticket_id = %ticket_id, user_id = %actor.user_id, "ticket resolved");

        self.publish(TICKET_AGGREGATE, *ticket_id.as_uuid(), base, events);
        Ok(&self.tickets[pos])
    }

    /// Tickets visible to `actor`, newest first: customers see only their own.
    pub fn tickets(&self, actor: &Principal) -> Vec<&Ticket> {
        let all = actor.role.grants(&Permission::TICKETS_READ_ALL);
        self.tickets
            .iter()
            .filter(|ticket| all || ticket.is_opened_by(actor))
            .collect()
    }

    // ---- dashboard -----------------------------------------------------

    pub fn dashboard(&self, actor: &Principal) -> StoreResult<DashboardStats> {
        authorize(actor, &Permission::DASHBOARD_VIEW)?;
        Ok(DashboardStats::compute(&self.catalog, &self.orders))
    }

    // ---- internals -----------------------------------------------------

    /// Returns whether anything changed.
    fn execute_catalog(&mut self, cmd: CatalogCommand) -> StoreResult<bool> {
        let base = self.catalog.version();
        let events = self.catalog.execute(&cmd)?;
        let changed = !events.is_empty();
        self.publish(CATALOG_AGGREGATE, Uuid::nil(), base, events);
        Ok(changed)
    }

    fn execute_order(
        &mut self,
        order_id: OrderId,
        cmd: OrderCommand,
        action: &'static str,
    ) -> StoreResult<&Order> {
        let pos = self
            .orders
            .iter()
            .position(|o| o.id_typed() == order_id)
            .ok_or(StoreError::NotFound)?;

        let order = &mut self.orders[pos];
        let base = order.version();
        let events = order.execute(&cmd).inspect_err(|e| {
            tracing::debug!(order_id = %order_id, error = %e, "order transition rejected");
        })?;
        tracing::info!(order_id = %order_id, status = %order.status(), "{action}");

        self.publish(ORDER_AGGREGATE, *order_id.as_uuid(), base, events);
        Ok(&self.orders[pos])
    }

    fn publish<E>(&self, aggregate_type: &'static str, aggregate_id: Uuid, base_version: u64, events: Vec<E>)
    where
        E: Into<StoreEvent>,
    {
        for (offset, event) in events.into_iter().enumerate() {
            let envelope = EventEnvelope::new(
                self.ids.next_uuid(),
                aggregate_id,
                aggregate_type,
                base_version + offset as u64 + 1,
                event.into(),
            );
            if let Err(err) = self.bus.publish(envelope) {
                tracing::warn!(aggregate_type, %aggregate_id, error = ?err, "event publish failed");
            }
        }
    }
}
