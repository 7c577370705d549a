//! Host storage abstraction
//!
//! The browser build backs this with `localStorage`; native builds and tests
//! use [`MemoryStorage`].

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::MapError;

/// String key/value store provided by the host
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, MapError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MapError>;
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, MapError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MapError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and deserialize a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T, E>(
    storage: &dyn Storage,
    key: &str,
    map_err: E,
) -> Result<Option<T>, MapError>
where
    T: DeserializeOwned,
    E: FnOnce(serde_json::Error) -> MapError,
{
    match storage.get_item(key)? {
        Some(json) => serde_json::from_str(&json).map(Some).map_err(map_err),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value
pub fn save_json<T: Serialize>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), MapError> {
    let json = serde_json::to_string(value).map_err(|e| MapError::Storage(e.to_string()))?;
    storage.set_item(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        save_json(&mut storage, "k", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> =
            load_json(&storage, "k", MapError::InvalidBindings).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_load_json_reports_corruption() {
        let mut storage = MemoryStorage::new();
        storage.set_item("k", "[1, 2").unwrap();
        let loaded: Result<Option<Vec<u32>>, _> =
            load_json(&storage, "k", MapError::InvalidBindings);
        assert!(matches!(loaded, Err(MapError::InvalidBindings(_))));
    }
}
