//! `medimart-core`: ids, money, clock and the aggregate contract shared by
//! every domain crate. Nothing here performs IO.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use id::{IdGenerator, ItemId, OrderId, SequentialIdGenerator, TicketId, UserId, UuidIdGenerator};
pub use money::Money;
pub use value_object::ValueObject;
