//! File-backed session persistence.
//!
//! The file holds a single JSON object with one key, [`SESSION_STORAGE_KEY`],
//! mapping to the camelCase identity record.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use medimart_auth::{Identity, SESSION_STORAGE_KEY, SessionError, SessionStore};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Identity>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut records: BTreeMap<String, Identity> = serde_json::from_str(&raw)?;
        Ok(records.remove(SESSION_STORAGE_KEY))
    }

    fn save(&self, identity: &Identity) -> Result<(), SessionError> {
        let mut records = BTreeMap::new();
        records.insert(SESSION_STORAGE_KEY, identity);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&records)?)?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medimart_auth::{PhoneNumber, Role};
    use medimart_core::UserId;

    fn identity() -> Identity {
        Identity {
            id: UserId::new(),
            name: "Demo Customer".to_string(),
            email: "customer@demo.com".to_string(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            role: Role::Customer,
            is_verified: true,
            address: Some("Harsh Enterprises, Patna, Bihar".to_string()),
        }
    }

    #[test]
    fn missing_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
        let who = identity();

        store.save(&who).unwrap();
        assert_eq!(store.load().unwrap(), Some(who));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn record_is_stored_under_fixed_key_with_camel_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.save(&identity()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["medimart_user"]["isVerified"], true);
        assert_eq!(json["medimart_user"]["role"], "CUSTOMER");
    }

    #[test]
    fn garbage_file_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileSessionStore::new(path).load().unwrap_err();
        assert!(matches!(err, SessionError::Corrupt(_)));
    }
}
