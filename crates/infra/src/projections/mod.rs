//! Read models derived from store state and published events.
//!
//! - `dashboard` summarises current orders and catalog for staff.
//! - `activity` is a bus-fed feed, rebuildable by replaying envelopes.

pub mod activity;
pub mod dashboard;

pub use activity::{ActivityEntry, ActivityFeed};
pub use dashboard::DashboardStats;
