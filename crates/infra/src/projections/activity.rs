use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use medimart_events::{Event, EventEnvelope, Projection};

use crate::events::StoreEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub event_type: &'static str,
    pub aggregate_type: String,
    pub aggregate_id: Uuid,
    pub sequence_number: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Bounded feed of recent store activity, newest first.
///
/// Tracks the last applied sequence number per stream, so redelivered or
/// stale envelopes are skipped.
#[derive(Debug)]
pub struct ActivityFeed {
    capacity: usize,
    entries: Vec<ActivityEntry>,
    cursors: HashMap<Uuid, u64>,
}

impl ActivityFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
            cursors: HashMap::new(),
        }
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Projection for ActivityFeed {
    type Ev = StoreEvent;

    fn apply(&mut self, envelope: &EventEnvelope<StoreEvent>) {
        let last = self
            .cursors
            .get(&envelope.aggregate_id())
            .copied()
            .unwrap_or(0);
        if envelope.sequence_number() <= last {
            return;
        }
        self.cursors
            .insert(envelope.aggregate_id(), envelope.sequence_number());

        self.entries.insert(
            0,
            ActivityEntry {
                event_type: envelope.payload().event_type(),
                aggregate_type: envelope.aggregate_type().to_string(),
                aggregate_id: envelope.aggregate_id(),
                sequence_number: envelope.sequence_number(),
                occurred_at: envelope.payload().occurred_at(),
            },
        );
        self.entries.truncate(self.capacity);
    }
}
