//! Record store boundary: opaque bytes under string keys

use gofinances_core::TransactionError;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("collection under '{key}' is not a JSON array: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("could not encode collection for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("collection under '{key}' cannot be summarized: {source}")]
    Summary {
        key: String,
        #[source]
        source: TransactionError,
    },

    #[error("record #{index} under '{key}' rejected: {source}")]
    Rejected {
        key: String,
        index: usize,
        #[source]
        source: TransactionError,
    },
}

/// Durable key-value storage. Values are whole collections; there is no
/// partial update.
pub trait RecordStore {
    /// `Ok(None)` when nothing is stored under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Deleting a missing key succeeds
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store, mostly for tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
