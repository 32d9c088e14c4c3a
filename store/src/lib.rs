//! Abstract storage for per-blob audit state.
//!
//! Backends implement [`AuditStore`]; the rest of the workspace depends only
//! on the trait. Records are opaque bytes keyed by blob id — the audit crate
//! owns the encoding, so backends stay schema-free.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::MemoryAuditStore;

use pora_types::BlobId;

/// Per-blob record storage. One record per blob, replaced wholesale on every
/// successful transition — never partially mutated.
pub trait AuditStore: Send + Sync {
    /// Fetch the record for a blob, `None` if the blob was never onboarded.
    fn get(&self, blob: &BlobId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write (or overwrite) the record for a blob.
    fn put(&self, blob: &BlobId, record: &[u8]) -> Result<(), StoreError>;

    /// Drop the record for a blob (used when a blob is retired).
    fn remove(&self, blob: &BlobId) -> Result<(), StoreError>;
}

impl<S: AuditStore + ?Sized> AuditStore for std::sync::Arc<S> {
    fn get(&self, blob: &BlobId) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(blob)
    }

    fn put(&self, blob: &BlobId, record: &[u8]) -> Result<(), StoreError> {
        (**self).put(blob, record)
    }

    fn remove(&self, blob: &BlobId) -> Result<(), StoreError> {
        (**self).remove(blob)
    }
}
