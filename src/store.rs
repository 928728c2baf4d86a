//! User record persistence
//!
//! Persisted to LocalStorage under a single key on web. Elsewhere the record
//! lives in memory for the lifetime of the process.

use crate::error::StoreError;
use crate::identity::UserRecord;

/// Key/value blob store holding the signed-in user
pub trait UserStore {
    /// Current record, `None` when nobody is signed in
    fn get(&self) -> Option<UserRecord>;
    /// Replace the stored record
    fn set(&mut self, record: &UserRecord) -> Result<(), StoreError>;
    /// Forget the stored record
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Sign the current user out
pub fn logout<S: UserStore>(store: &mut S) -> Result<(), StoreError> {
    store.clear()?;
    log::info!("Signed out");
    Ok(())
}

/// In-memory store (native builds and tests)
///
/// Holds the encoded JSON so reads and writes go through the same
/// serialization path as LocalStorage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a record
    pub fn with_user(record: &UserRecord) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.set(record)?;
        Ok(store)
    }

    /// Raw stored blob
    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }

    /// Overwrite the raw blob, bypassing encoding
    pub fn set_raw(&mut self, json: impl Into<String>) {
        self.json = Some(json.into());
    }
}

impl UserStore for MemoryStore {
    fn get(&self) -> Option<UserRecord> {
        decode(self.json.as_deref()?)
    }

    fn set(&mut self, record: &UserRecord) -> Result<(), StoreError> {
        self.json = Some(serde_json::to_string(record)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.json = None;
        Ok(())
    }
}

/// Decode a stored blob; a corrupt blob reads as "nobody signed in"
fn decode(json: &str) -> Option<UserRecord> {
    match serde_json::from_str(json) {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("Ignoring corrupt user record: {}", e);
            None
        }
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "user";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl UserStore for LocalStorageStore {
    fn get(&self) -> Option<UserRecord> {
        let storage = Self::storage().ok()?;
        let json = storage.get_item(Self::STORAGE_KEY).ok()??;
        decode(&json)
    }

    fn set(&mut self, record: &UserRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(Self::STORAGE_KEY)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(), None);

        let mut record = UserRecord::new("Rook");
        record.points = 120;
        store.set(&record).unwrap();
        assert_eq!(store.get(), Some(record));
    }

    #[test]
    fn test_logout_clears() {
        let mut store = MemoryStore::with_user(&UserRecord::new("Rook")).unwrap();
        logout(&mut store).unwrap();
        assert_eq!(store.get(), None);
        assert_eq!(store.raw(), None);
    }

    #[test]
    fn test_corrupt_blob_reads_as_absent() {
        let mut store = MemoryStore::new();
        store.set_raw("{not json");
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_reads_record_without_optional_fields() {
        let mut store = MemoryStore::new();
        store.set_raw(r#"{"username":"Rook","points":7,"rank":0}"#);
        let record = store.get().unwrap();
        assert_eq!(record.points, 7);
        assert_eq!(record.email, None);
        assert!(record.avatar.is_empty());
    }
}
