use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use medimart_auth::{ContactSnapshot, Permission, Principal, authorize};
use medimart_core::{Aggregate, AggregateRoot, DomainError, Money, OrderId};
use medimart_events::Event;

use crate::delivery::{Region, validate_requested_date};
use crate::lifecycle::{DeliveryCharge, OrderStatus};
use crate::pricing::{OrderLine, PricingPolicy, checked_order_total};

/// Aggregate root: Order.
///
/// Customer, lines, total and address are fixed by `OrderPlaced`; staff
/// commands may only move the status and set the delivery charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer: Option<ContactSnapshot>,
    address: String,
    region: Region,
    requested_delivery_date: Option<NaiveDate>,
    lines: Vec<OrderLine>,
    total_amount: Money,
    free_delivery: bool,
    delivery_charge: DeliveryCharge,
    status: OrderStatus,
    created_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Order {
    /// Create an empty, not-yet-placed aggregate instance.
    pub fn empty(id: OrderId) -> Self {
        Self {
            id,
            customer: None,
            address: String::new(),
            region: Region::default(),
            requested_delivery_date: None,
            lines: Vec::new(),
            total_amount: Money::ZERO,
            free_delivery: false,
            delivery_charge: DeliveryCharge::Undetermined,
            status: OrderStatus::Pending,
            created_at: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> Option<&ContactSnapshot> {
        self.customer.as_ref()
    }

    pub fn is_placed_by(&self, principal: &Principal) -> bool {
        self.customer
            .as_ref()
            .is_some_and(|c| c.id == principal.user_id)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn requested_delivery_date(&self) -> Option<NaiveDate> {
        self.requested_delivery_date
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn is_free_delivery(&self) -> bool {
        self.free_delivery
    }

    pub fn delivery_charge(&self) -> DeliveryCharge {
        self.delivery_charge
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// `total + delivery charge`, known once the charge has been set.
    pub fn payable_amount(&self) -> Option<Money> {
        self.delivery_charge
            .amount()
            .map(|charge| self.total_amount + charge)
    }

    /// Charge staff should be offered when accepting this order.
    ///
    /// Zero for free-delivery orders, `default_charge` otherwise; `None`
    /// once the order is no longer pending.
    pub fn suggested_delivery_charge(&self, default_charge: Money) -> Option<Money> {
        if !self.created || self.status != OrderStatus::Pending {
            return None;
        }
        Some(if self.free_delivery {
            Money::ZERO
        } else {
            default_charge
        })
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub actor: Principal,
    pub order_id: OrderId,
    pub customer: ContactSnapshot,
    pub address: String,
    pub region: Region,
    pub requested_delivery_date: Option<NaiveDate>,
    pub lines: Vec<OrderLine>,
    pub pricing: PricingPolicy,
    /// Business date the delivery lead time is measured from.
    pub today: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AcceptOrder.
///
/// `delivery_charge` may be omitted only for free-delivery orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptOrder {
    pub actor: Principal,
    pub order_id: OrderId,
    pub delivery_charge: Option<Money>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeclineOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclineOrder {
    pub actor: Principal,
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DispatchOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOrder {
    pub actor: Principal,
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MarkDelivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkDelivered {
    pub actor: Principal,
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    PlaceOrder(PlaceOrder),
    AcceptOrder(AcceptOrder),
    DeclineOrder(DeclineOrder),
    DispatchOrder(DispatchOrder),
    MarkDelivered(MarkDelivered),
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub customer: ContactSnapshot,
    pub address: String,
    pub region: Region,
    pub requested_delivery_date: NaiveDate,
    pub lines: Vec<OrderLine>,
    pub total_amount: Money,
    pub free_delivery: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderAccepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAccepted {
    pub order_id: OrderId,
    pub delivery_charge: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDeclined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeclined {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDispatched {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDelivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDelivered {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderPlaced(OrderPlaced),
    OrderAccepted(OrderAccepted),
    OrderDeclined(OrderDeclined),
    OrderDispatched(OrderDispatched),
    OrderDelivered(OrderDelivered),
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "orders.order.placed",
            OrderEvent::OrderAccepted(_) => "orders.order.accepted",
            OrderEvent::OrderDeclined(_) => "orders.order.declined",
            OrderEvent::OrderDispatched(_) => "orders.order.dispatched",
            OrderEvent::OrderDelivered(_) => "orders.order.delivered",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderPlaced(e) => e.occurred_at,
            OrderEvent::OrderAccepted(e) => e.occurred_at,
            OrderEvent::OrderDeclined(e) => e.occurred_at,
            OrderEvent::OrderDispatched(e) => e.occurred_at,
            OrderEvent::OrderDelivered(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced(e) => {
                self.id = e.order_id;
                self.customer = Some(e.customer.clone());
                self.address = e.address.clone();
                self.region = e.region;
                self.requested_delivery_date = Some(e.requested_delivery_date);
                self.lines = e.lines.clone();
                self.total_amount = e.total_amount;
                self.free_delivery = e.free_delivery;
                self.delivery_charge = DeliveryCharge::Undetermined;
                self.status = OrderStatus::Pending;
                self.created_at = Some(e.occurred_at);
                self.created = true;
            }
            OrderEvent::OrderAccepted(e) => {
                self.status = OrderStatus::Accepted;
                self.delivery_charge = DeliveryCharge::Charged(e.delivery_charge);
            }
            OrderEvent::OrderDeclined(_) => {
                self.status = OrderStatus::Declined;
            }
            OrderEvent::OrderDispatched(_) => {
                self.status = OrderStatus::OutForDelivery;
            }
            OrderEvent::OrderDelivered(_) => {
                self.status = OrderStatus::Delivered;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::PlaceOrder(cmd) => self.handle_place(cmd),
            OrderCommand::AcceptOrder(cmd) => self.handle_accept(cmd),
            OrderCommand::DeclineOrder(cmd) => self.handle_decline(cmd),
            OrderCommand::DispatchOrder(cmd) => self.handle_dispatch(cmd),
            OrderCommand::MarkDelivered(cmd) => self.handle_mark_delivered(cmd),
        }
    }
}

impl Order {
    fn ensure_order_id(&self, order_id: OrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn ensure_transition(&self, order_id: OrderId, next: OrderStatus) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found("order"));
        }
        self.ensure_order_id(order_id)?;

        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "order is {}; no further transitions are allowed",
                self.status
            )));
        }
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "cannot move order from {} to {next}",
                self.status
            )));
        }
        Ok(())
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> Result<Vec<OrderEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::ORDERS_PLACE)?;
        if cmd.customer.id != cmd.actor.user_id {
            return Err(DomainError::Unauthorized);
        }
        if self.created {
            return Err(DomainError::conflict("order already exists"));
        }
        self.ensure_order_id(cmd.order_id)?;

        if cmd.lines.is_empty() {
            return Err(DomainError::validation("cannot place an order with an empty cart"));
        }
        if cmd.lines.iter().any(|line| line.quantity == 0) {
            return Err(DomainError::validation("line quantity must be positive"));
        }
        for (i, line) in cmd.lines.iter().enumerate() {
            if cmd.lines[..i].iter().any(|prev| prev.item_id == line.item_id) {
                return Err(DomainError::validation(format!(
                    "'{}' appears on more than one line",
                    line.name
                )));
            }
        }

        let address = cmd.address.trim();
        if address.is_empty() {
            return Err(DomainError::validation("delivery address is mandatory"));
        }

        let requested = cmd
            .requested_delivery_date
            .ok_or_else(|| DomainError::validation("a requested delivery date is required"))?;
        validate_requested_date(cmd.region, requested, cmd.today)?;

        let total_amount = checked_order_total(&cmd.lines)?;

        Ok(vec![OrderEvent::OrderPlaced(OrderPlaced {
            order_id: cmd.order_id,
            customer: cmd.customer.clone(),
            address: address.to_string(),
            region: cmd.region,
            requested_delivery_date: requested,
            lines: cmd.lines.clone(),
            total_amount,
            free_delivery: cmd.pricing.is_free_delivery_eligible(total_amount),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_accept(&self, cmd: &AcceptOrder) -> Result<Vec<OrderEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::ORDERS_DECIDE)?;
        self.ensure_transition(cmd.order_id, OrderStatus::Accepted)?;

        if cmd.delivery_charge.is_some_and(|charge| charge.is_negative()) {
            return Err(DomainError::validation("delivery charge cannot be negative"));
        }

        let delivery_charge = match (self.free_delivery, cmd.delivery_charge) {
            (true, None) => Money::ZERO,
            (true, Some(charge)) if charge.is_zero() => Money::ZERO,
            (true, Some(_)) => {
                return Err(DomainError::validation(
                    "order qualifies for free delivery; delivery charge must be 0",
                ));
            }
            (false, Some(charge)) => {
                self.total_amount.checked_add(charge)?;
                charge
            }
            (false, None) => {
                return Err(DomainError::validation(
                    "a delivery charge is required to accept this order",
                ));
            }
        };

        Ok(vec![OrderEvent::OrderAccepted(OrderAccepted {
            order_id: cmd.order_id,
            delivery_charge,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_decline(&self, cmd: &DeclineOrder) -> Result<Vec<OrderEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::ORDERS_DECIDE)?;
        self.ensure_transition(cmd.order_id, OrderStatus::Declined)?;

        Ok(vec![OrderEvent::OrderDeclined(OrderDeclined {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_dispatch(&self, cmd: &DispatchOrder) -> Result<Vec<OrderEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::ORDERS_FULFIL)?;
        self.ensure_transition(cmd.order_id, OrderStatus::OutForDelivery)?;

        Ok(vec![OrderEvent::OrderDispatched(OrderDispatched {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_mark_delivered(&self, cmd: &MarkDelivered) -> Result<Vec<OrderEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::ORDERS_FULFIL)?;
        self.ensure_transition(cmd.order_id, OrderStatus::Delivered)?;

        Ok(vec![OrderEvent::OrderDelivered(OrderDelivered {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
