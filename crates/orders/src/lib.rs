//! Orders domain module.
//!
//! Cart pricing, delivery-date eligibility and the order lifecycle,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod cart;
pub mod delivery;
pub mod lifecycle;
pub mod order;
pub mod pricing;

pub use cart::Cart;
pub use delivery::{DeliverySchedule, Region, minimum_delivery_date, validate_requested_date};
pub use lifecycle::{DeliveryCharge, OrderStatus};
pub use order::{
    AcceptOrder, DeclineOrder, DispatchOrder, MarkDelivered, Order, OrderAccepted, OrderCommand,
    OrderDeclined, OrderDelivered, OrderDispatched, OrderEvent, OrderPlaced, PlaceOrder,
};
pub use pricing::{
    DEFAULT_FREE_DELIVERY_THRESHOLD, OrderLine, PricingPolicy, checked_order_total, line_total,
    order_total,
};
