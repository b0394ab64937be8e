//! Snapshot persistence on top of a [`KeyValueStore`].
//!
//! The whole collection is written as one JSON array under a single key.
//! Loading never fails: a missing or unreadable value yields an empty
//! collection, and individual malformed entries are dropped.

use crate::{
    backend::KeyValueStore,
    error::StorageError,
    types::{Interview, InterviewId},
};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

pub const DEFAULT_STORAGE_KEY: &str = "interviews";

pub struct SnapshotPersistence<S: KeyValueStore> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotPersistence<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self) -> Vec<Interview> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!(key = %self.key, "No stored interviews, starting empty");
                return vec![];
            }
            Err(err) => {
                warn!(%err, key = %self.key, "Failed to read stored interviews, starting empty");
                return vec![];
            }
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!(key = %self.key, "Stored interviews are not an array, starting empty");
                return vec![];
            }
            Err(err) => {
                warn!(%err, key = %self.key, "Stored interviews are corrupt, starting empty");
                return vec![];
            }
        };

        let total = entries.len();
        let mut seen: HashSet<InterviewId> = HashSet::with_capacity(total);
        let interviews: Vec<Interview> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Interview>(entry) {
                Ok(interview) if seen.insert(interview.id) => Some(interview),
                Ok(interview) => {
                    warn!(id = interview.id, "Dropping interview with duplicate id");
                    None
                }
                Err(err) => {
                    warn!(%err, "Dropping malformed interview entry");
                    None
                }
            })
            .collect();

        info!(
            loaded = interviews.len(),
            discarded = total - interviews.len(),
            "Restored interviews"
        );
        interviews
    }

    pub fn save(&self, interviews: &[Interview]) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(interviews)?;
        self.storage.set(&self.key, serialized)
    }
}
