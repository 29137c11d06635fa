//! Device-local key-value storage.
//!
//! The browser build backs this with `window.localStorage`; tests and native
//! tooling use [`MemoryStorage`]. Values are plain strings, structured values
//! go through JSON via [`load_json`] / [`store_json`].

mod error;

pub use error::StorageError;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Persistent string storage keyed by name.
///
/// Methods take `&self`; implementations rely on interior mutability the same
/// way the browser storage object does.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read and deserialize a JSON value. Missing keys yield `Ok(None)`.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Decode {
            key: key.to_string(),
            source,
        })
}

/// Serialize a value as JSON and store it.
pub fn store_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Write {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let store = MemoryStorage::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn load_json_reports_corrupt_values() {
        let store = MemoryStorage::new();
        store.set("session", "{not json").unwrap();

        let result: Result<Option<Vec<u32>>, _> = load_json(&store, "session");
        assert!(matches!(result, Err(StorageError::Decode { .. })));
    }

    #[test]
    fn json_values_survive_storage() {
        let store = MemoryStorage::new();
        store_json(&store, "ids", &vec![1u32, 2, 3]).unwrap();

        let ids: Option<Vec<u32>> = load_json(&store, "ids").unwrap();
        assert_eq!(ids, Some(vec![1, 2, 3]));
    }
}
