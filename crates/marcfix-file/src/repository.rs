//! Filesystem backup repository.
//!
//! Layout under the root directory:
//!
//! ```text
//! store.lock
//! batches/
//!   batch-20180201T040000123/
//!     000000001.json
//!     000000042.json
//! ```
//!
//! Every operation takes the store lock for its whole duration, so
//! concurrent processes never see a half-written batch.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use marcfix_core::Result;
use marcfix_core::error::StoreError;
use marcfix_core::record::BackupEntry;
use marcfix_core::traits::{BackupRepository, StoreStats};
use marcfix_core::types::{BatchId, RecordId};

use crate::store::{StoreLock, json_files, map_io, read_json, write_json};

/// Backup repository keeping one directory per batch.
#[derive(Debug, Clone)]
pub struct FileBackupRepository {
    root: PathBuf,
}

impl FileBackupRepository {
    /// Open a repository rooted at `root`. Nothing is created until the
    /// first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock(&self) -> Result<StoreLock> {
        StoreLock::acquire(&self.root.join("store.lock"))
    }

    fn batches_dir(&self) -> PathBuf {
        self.root.join("batches")
    }

    fn batch_dir(&self, batch: &BatchId) -> PathBuf {
        self.batches_dir().join(batch.as_str())
    }

    fn entry_path(&self, batch: &BatchId, id: &RecordId) -> PathBuf {
        self.batch_dir(batch).join(format!("{}.json", id.padded()))
    }

    fn batch_ids(&self) -> Result<Vec<BatchId>> {
        let dir = self.batches_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut batches = Vec::new();
        for entry in fs::read_dir(&dir).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            if !entry.file_type().map_err(map_io)?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            match name.to_str().map(BatchId::new) {
                Some(Ok(batch)) => batches.push(batch),
                _ => warn!(dir = ?name, "skipping unrecognized batch directory"),
            }
        }
        batches.sort();
        Ok(batches)
    }
}

#[async_trait]
impl BackupRepository for FileBackupRepository {
    #[instrument(skip(self, entries), fields(%batch, count = entries.len()))]
    async fn insert_many(&self, batch: &BatchId, entries: &[BackupEntry]) -> Result<Vec<RecordId>> {
        let _lock = self.lock()?;

        let mut inserted = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = self.entry_path(batch, &entry.id);
            if path.exists() {
                return Err(StoreError::DuplicateEntry {
                    batch: batch.to_string(),
                    id: entry.id,
                }
                .into());
            }
            write_json(&path, entry)?;
            inserted.push(entry.id);
        }

        debug!(inserted = inserted.len(), "wrote backup entries");
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn find_batch(&self, batch: &BatchId) -> Result<Vec<BackupEntry>> {
        let _lock = self.lock()?;

        let mut entries = Vec::new();
        for path in json_files(&self.batch_dir(batch))? {
            if let Some(entry) = read_json::<BackupEntry>(&path)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn find_entry(&self, batch: &BatchId, id: &RecordId) -> Result<Option<BackupEntry>> {
        let _lock = self.lock()?;
        read_json(&self.entry_path(batch, id))
    }

    async fn list_batches(&self) -> Result<Vec<BatchId>> {
        let _lock = self.lock()?;
        self.batch_ids()
    }

    async fn stats(&self) -> Result<StoreStats> {
        let _lock = self.lock()?;

        let mut stats = StoreStats::default();
        for batch in self.batch_ids()? {
            stats.collections += 1;
            stats.records += json_files(&self.batch_dir(&batch))?.len();
        }
        Ok(stats)
    }

    #[instrument(skip(self))]
    async fn drop_all(&self) -> Result<()> {
        let _lock = self.lock()?;

        let dir = self.batches_dir();
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(map_io)?;
        }
        debug!(root = %self.root.display(), "dropped all batches");
        Ok(())
    }
}
