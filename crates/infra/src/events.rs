//! The store-wide event type published on the bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medimart_catalog::CatalogEvent;
use medimart_events::{Event, EventEnvelope};
use medimart_orders::OrderEvent;
use medimart_support::TicketEvent;

pub const CATALOG_AGGREGATE: &str = "catalog";
pub const ORDER_AGGREGATE: &str = "orders.order";
pub const TICKET_AGGREGATE: &str = "support.ticket";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    Catalog(CatalogEvent),
    Order(OrderEvent),
    Ticket(TicketEvent),
}

pub type StoreEnvelope = EventEnvelope<StoreEvent>;

impl Event for StoreEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::Catalog(e) => e.event_type(),
            StoreEvent::Order(e) => e.event_type(),
            StoreEvent::Ticket(e) => e.event_type(),
        }
    }

    fn version(&self) -> u32 {
        match self {
            StoreEvent::Catalog(e) => e.version(),
            StoreEvent::Order(e) => e.version(),
            StoreEvent::Ticket(e) => e.version(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StoreEvent::Catalog(e) => e.occurred_at(),
            StoreEvent::Order(e) => e.occurred_at(),
            StoreEvent::Ticket(e) => e.occurred_at(),
        }
    }
}

impl From<CatalogEvent> for StoreEvent {
    fn from(value: CatalogEvent) -> Self {
        StoreEvent::Catalog(value)
    }
}

impl From<OrderEvent> for StoreEvent {
    fn from(value: OrderEvent) -> Self {
        StoreEvent::Order(value)
    }
}

impl From<TicketEvent> for StoreEvent {
    fn from(value: TicketEvent) -> Self {
        StoreEvent::Ticket(value)
    }
}
