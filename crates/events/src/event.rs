use chrono::{DateTime, Utc};

/// A fact recorded by an aggregate after a command succeeded.
///
/// Event values are never mutated once emitted; a change in meaning gets a
/// new `version`.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted `<context>.<aggregate>.<fact>` name, e.g. `orders.order.accepted`.
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32 {
        1
    }

    /// Business time taken from the originating command.
    fn occurred_at(&self) -> DateTime<Utc>;
}
