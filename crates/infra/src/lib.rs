//! Infrastructure layer: configuration, the application store, session
//! persistence and read models.

pub mod config;
pub mod error;
pub mod events;
pub mod projections;
pub mod session;
pub mod store;

mod integration_tests;

pub use config::{AppConfig, ConfigError};
pub use error::{StoreError, StoreResult};
pub use events::{StoreEnvelope, StoreEvent};
pub use projections::{ActivityEntry, ActivityFeed, DashboardStats};
pub use session::FileSessionStore;
pub use store::{AppStore, ItemDraft};
