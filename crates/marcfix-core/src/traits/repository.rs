//! Backup repository trait.

use async_trait::async_trait;

use crate::Result;
use crate::record::BackupEntry;
use crate::types::{BatchId, RecordId};

/// Size of the backup store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored entries across all batches.
    pub records: usize,
    /// Number of batch collections.
    pub collections: usize,
}

impl StoreStats {
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/// Keyed-collection storage for backup entries: one collection per batch,
/// one entry per record id within a collection.
///
/// Implementations acquire whatever connection or lock they need per call
/// and release it before returning, on success and on failure.
#[async_trait]
pub trait BackupRepository: Send + Sync {
    /// Insert entries into a batch collection, creating it if needed.
    ///
    /// Each insert is independent: a failure leaves earlier entries in place.
    /// Returns the ids that were inserted.
    async fn insert_many(&self, batch: &BatchId, entries: &[BackupEntry]) -> Result<Vec<RecordId>>;

    /// Read every entry of a batch collection.
    async fn find_batch(&self, batch: &BatchId) -> Result<Vec<BackupEntry>>;

    /// Read a single entry of a batch collection.
    async fn find_entry(&self, batch: &BatchId, id: &RecordId) -> Result<Option<BackupEntry>>;

    /// List all batch collections.
    async fn list_batches(&self) -> Result<Vec<BatchId>>;

    /// Count entries and collections.
    async fn stats(&self) -> Result<StoreStats>;

    /// Delete every collection.
    async fn drop_all(&self) -> Result<()>;
}
