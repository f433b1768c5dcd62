use crate::{Event, EventEnvelope};

/// A projection builds a read model from published envelopes.
///
/// Projections are disposable views: they may be dropped and rebuilt by
/// subscribing again, and must ignore events that are not relevant to them.
/// `apply` must be idempotent for a repeated `(aggregate_id, sequence_number)`.
pub trait Projection {
    type Ev: Event;

    /// Apply a single event to the projection, updating the read model.
    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);

    /// Apply a batch in order.
    fn apply_all<'a, I>(&mut self, envelopes: I)
    where
        I: IntoIterator<Item = &'a EventEnvelope<Self::Ev>>,
        Self::Ev: 'a,
    {
        for envelope in envelopes {
            self.apply(envelope);
        }
    }
}
