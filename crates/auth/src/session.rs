//! Persisted sign-in session.
//!
//! Exactly one record is persisted: the signed-in [`Identity`] under
//! [`SESSION_STORAGE_KEY`]. Catalog, orders and tickets are never persisted.

use std::sync::Mutex;

use thiserror::Error;

use crate::Identity;

/// Fixed storage key of the session record.
pub const SESSION_STORAGE_KEY: &str = "medimart_user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

pub trait SessionStore: Send + Sync {
    /// Read the stored identity, if any.
    fn load(&self) -> Result<Option<Identity>, SessionError>;

    /// Replace the stored identity.
    fn save(&self, identity: &Identity) -> Result<(), SessionError>;

    /// Remove the stored identity (no-op when absent).
    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local session store; the record keeps its serialized form so
/// loading exercises the same decoding as a durable store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    record: Mutex<Option<String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, SessionError> {
        self.record
            .lock()
            .map_err(|_| SessionError::Unavailable("session lock poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<Identity>, SessionError> {
        match self.lock()?.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, identity: &Identity) -> Result<(), SessionError> {
        let raw = serde_json::to_string(identity)?;
        *self.lock()? = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.lock()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PhoneNumber, Role};
    use medimart_core::UserId;

    fn identity() -> Identity {
        Identity {
            id: UserId::new(),
            name: "Demo Customer".to_string(),
            email: "customer@demo.com".to_string(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            role: Role::Customer,
            is_verified: true,
            address: None,
        }
    }

    #[test]
    fn save_load_clear() {
        let store = InMemorySessionStore::new();
        assert!(store.load().unwrap().is_none());

        let id = identity();
        store.save(&id).unwrap();
        assert_eq!(store.load().unwrap(), Some(id));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }
}
