//! Anonymous per-device identity.
//!
//! The first resolution generates a UUID v4 and stores it; every later
//! resolution on the same device returns the stored value.

use passport_types::UserId;
use tracing::{debug, info};
use uuid::Uuid;

use super::IdentityError;
use crate::storage::KeyValueStore;

pub fn resolve_device_id<S>(store: &S, key: &str) -> Result<UserId, IdentityError>
where
    S: KeyValueStore + ?Sized,
{
    if let Some(existing) = store.get(key).map_err(IdentityError)?
        && !existing.trim().is_empty()
    {
        debug!(user_id = %existing, "Reusing device identifier");
        return Ok(UserId::new(existing));
    }

    let id = Uuid::new_v4().to_string();
    store.set(key, &id).map_err(IdentityError)?;
    info!(user_id = %id, "Generated device identifier");
    Ok(UserId::new(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    const KEY: &str = "venue_user_id";

    #[test]
    fn first_resolution_generates_and_persists() {
        let store = MemoryStorage::new();
        let id = resolve_device_id(&store, KEY).unwrap();

        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some(id.as_str()));
    }

    #[test]
    fn later_resolutions_reuse_stored_id() {
        let store = MemoryStorage::new();
        let first = resolve_device_id(&store, KEY).unwrap();
        let second = resolve_device_id(&store, KEY).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_stored_value_is_replaced() {
        let store = MemoryStorage::new();
        store.set(KEY, "  ").unwrap();
        let id = resolve_device_id(&store, KEY).unwrap();
        assert!(!id.as_str().trim().is_empty());
    }

    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn unavailable_storage_fails_resolution() {
        assert!(resolve_device_id(&BrokenStorage, KEY).is_err());
    }
}
