use crate::error::StorageError;

/// Durable string storage addressed by a fixed key.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
