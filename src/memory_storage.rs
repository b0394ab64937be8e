use crate::{backend::KeyValueStore, error::StorageError};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// In-memory storage; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryKeyValueStore::default();
        let other = storage.clone();

        storage.set("interviews", "[]".into()).unwrap();

        assert_eq!(other.get("interviews").unwrap().as_deref(), Some("[]"));
        assert_eq!(other.get("something_else").unwrap(), None);
    }
}
