//! Domain events and their in-process distribution.
//!
//! Aggregates emit typed events; the application store wraps each applied
//! event in an [`EventEnvelope`] and publishes it on an [`EventBus`] so that
//! presentation layers can subscribe instead of polling shared state.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod projection;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use projection::Projection;
