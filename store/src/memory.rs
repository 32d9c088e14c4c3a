//! In-memory store — the default backend for tests and embedding.

use crate::{AuditStore, StoreError};
use pora_types::BlobId;
use std::collections::HashMap;
use std::sync::Mutex;

/// A thread-safe in-memory audit store.
pub struct MemoryAuditStore {
    records: Mutex<HashMap<BlobId, Vec<u8>>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Number of blobs with a stored record.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditStore for MemoryAuditStore {
    fn get(&self, blob: &BlobId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.lock().unwrap().get(blob).cloned())
    }

    fn put(&self, blob: &BlobId, record: &[u8]) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(blob.clone(), record.to_vec());
        Ok(())
    }

    fn remove(&self, blob: &BlobId) -> Result<(), StoreError> {
        self.records.lock().unwrap().remove(blob);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove_round_trip() {
        let store = MemoryAuditStore::new();
        let blob = BlobId::new("blob-1");

        assert!(store.get(&blob).unwrap().is_none());

        store.put(&blob, b"record").unwrap();
        assert_eq!(store.get(&blob).unwrap().unwrap(), b"record");

        store.put(&blob, b"replaced").unwrap();
        assert_eq!(store.get(&blob).unwrap().unwrap(), b"replaced");

        store.remove(&blob).unwrap();
        assert!(store.get(&blob).unwrap().is_none());
    }

    #[test]
    fn blobs_are_isolated() {
        let store = MemoryAuditStore::new();
        store.put(&BlobId::new("a"), b"1").unwrap();
        store.put(&BlobId::new("b"), b"2").unwrap();
        assert_eq!(store.get(&BlobId::new("a")).unwrap().unwrap(), b"1");
        assert_eq!(store.get(&BlobId::new("b")).unwrap().unwrap(), b"2");
    }
}
