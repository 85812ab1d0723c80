//! Backup persistence and rollback.
//!
//! Every fix result is stored under the batch that produced it. Rollback
//! restores the stored original, carrying forward only the newest
//! cataloging field of the live record so the restore itself is recorded
//! in the record's history.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::Result;
use crate::record::{BackupEntry, CATALOGING_TAG, FixResult, Record, UpdateOptions, UpdateResponse};
use crate::traits::{BackupRepository, RecordClient, StoreStats};
use crate::types::{BatchId, RecordId};

/// Confirmation of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    /// The batch that was written to.
    pub batch_id: BatchId,
    /// Ids of the entries that were inserted.
    pub inserted_ids: Vec<RecordId>,
}

impl SaveReceipt {
    /// Number of inserted entries.
    pub fn inserted_count(&self) -> usize {
        self.inserted_ids.len()
    }
}

/// The outcome of reverting one record.
#[derive(Debug, Clone)]
pub struct RevertOutcome {
    /// The record id.
    pub id: RecordId,
    /// What happened.
    pub status: RevertStatus,
}

/// How a single revert ended.
#[derive(Debug, Clone)]
pub enum RevertStatus {
    /// The API accepted the restored record.
    Reverted(UpdateResponse),
    /// The API accepted the restored record with warnings.
    RevertedWithWarnings(UpdateResponse),
    /// The API answered but reported errors.
    Rejected(UpdateResponse),
    /// The revert could not be submitted.
    Failed(String),
}

impl RevertStatus {
    /// Returns true if the restored record was accepted.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            RevertStatus::Reverted(_) | RevertStatus::RevertedWithWarnings(_)
        )
    }
}

impl RevertOutcome {
    /// Returns true if the restored record was accepted.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a wipe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeOutcome {
    /// Nothing to delete.
    Empty,
    /// The confirmation callback said no.
    Declined,
    /// Everything was deleted.
    Wiped(StoreStats),
}

/// Build the record to submit when rolling back.
///
/// Starts from the stored original and appends the last cataloging field
/// of the live record, if it has one. Nothing else is carried over.
pub fn rollback_projection(original: Record, current: &Record) -> Record {
    let mut restored = original;
    if let Some(cataloging) = current.get(CATALOGING_TAG).last() {
        restored.append_field(cataloging.clone());
    }
    restored
}

/// Delete every batch in `repository` after the caller confirms.
///
/// `confirm` sees the store statistics and is not called for an empty store.
#[instrument(skip_all)]
pub async fn wipe<S, F>(repository: &S, confirm: F) -> Result<WipeOutcome>
where
    S: BackupRepository + ?Sized,
    F: FnOnce(&StoreStats) -> bool,
{
    let stats = repository.stats().await?;
    if stats.is_empty() {
        info!("backup store is already empty");
        return Ok(WipeOutcome::Empty);
    }

    if !confirm(&stats) {
        info!("wipe declined");
        return Ok(WipeOutcome::Declined);
    }

    repository.drop_all().await?;
    info!(
        records = stats.records,
        collections = stats.collections,
        "backup store wiped"
    );
    Ok(WipeOutcome::Wiped(stats))
}

/// Durable before/after snapshots plus rollback.
pub struct BackupStore<C, S> {
    client: Arc<C>,
    repository: Arc<S>,
}

impl<C, S> Clone for BackupStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<C: RecordClient, S: BackupRepository> BackupStore<C, S> {
    /// Create a store over a record client (used for rollback) and a repository.
    pub fn new(client: Arc<C>, repository: Arc<S>) -> Self {
        Self { client, repository }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &Arc<S> {
        &self.repository
    }

    /// Append one entry per result to the batch collection.
    #[instrument(skip(self, results), fields(batch = %batch_id, count = results.len()))]
    pub async fn save(&self, batch_id: &BatchId, results: &[FixResult]) -> Result<SaveReceipt> {
        let entries = results
            .iter()
            .map(BackupEntry::from_result)
            .collect::<Result<Vec<_>>>()?;

        let inserted_ids = self.repository.insert_many(batch_id, &entries).await?;
        info!(inserted = inserted_ids.len(), "saved backup entries");

        Ok(SaveReceipt {
            batch_id: batch_id.clone(),
            inserted_ids,
        })
    }

    /// Restore every record of a batch to its pre-fix state.
    ///
    /// A failing record is reported and skipped; the rest still run.
    #[instrument(skip(self), fields(batch = %batch_id))]
    pub async fn revert_batch(&self, batch_id: &BatchId) -> Result<Vec<RevertOutcome>> {
        let entries = self.repository.find_batch(batch_id).await?;
        if entries.is_empty() {
            warn!("no backup entries in batch");
        }

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in &entries {
            let status = self.revert_entry(entry).await;
            outcomes.push(RevertOutcome {
                id: entry.id,
                status,
            });
        }

        let reverted = outcomes.iter().filter(|o| o.is_success()).count();
        info!(reverted, total = outcomes.len(), "batch reverted");
        Ok(outcomes)
    }

    /// Restore a record from its most recent backup.
    ///
    /// Scans batches newest first. Returns false if no backup exists or the
    /// submission was not accepted.
    #[instrument(skip(self), fields(%id))]
    pub async fn revert_single(&self, id: &RecordId) -> Result<bool> {
        let mut batches = self.repository.list_batches().await?;
        batches.sort_unstable_by(|a, b| b.cmp(a));

        for batch in &batches {
            if let Some(entry) = self.repository.find_entry(batch, id).await? {
                info!(%batch, "found backup entry");
                return Ok(self.revert_entry(&entry).await.is_success());
            }
        }

        warn!("no backup entry found");
        Ok(false)
    }

    async fn revert_entry(&self, entry: &BackupEntry) -> RevertStatus {
        let id = entry.id;

        let original = match entry.original() {
            Ok(record) => record,
            Err(err) => {
                error!(%id, error = %err, "cannot decode backup entry");
                return RevertStatus::Failed(err.to_string());
            }
        };

        let current = match self.client.load_record(&id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                error!(%id, "record no longer exists");
                return RevertStatus::Failed(format!("record {id} not found"));
            }
            Err(err) => {
                error!(%id, error = %err, "failed to load current record");
                return RevertStatus::Failed(err.to_string());
            }
        };

        let restored = rollback_projection(original, &current);
        match self
            .client
            .update_record(&restored, &UpdateOptions::default())
            .await
        {
            Ok(response) => {
                log_response(id, &response);
                if !response.is_success() {
                    RevertStatus::Rejected(response)
                } else if response.has_warnings() {
                    RevertStatus::RevertedWithWarnings(response)
                } else {
                    RevertStatus::Reverted(response)
                }
            }
            Err(err) => {
                error!(%id, error = %err, "failed to submit restored record");
                RevertStatus::Failed(err.to_string())
            }
        }
    }
}

fn log_response(id: RecordId, response: &UpdateResponse) {
    if !response.messages.is_empty() {
        info!(%id, messages = %response.message_text(), "record restored");
    }
    if !response.triggers.is_empty() {
        info!(%id, triggers = %response.trigger_text(), "triggers");
    }
    if !response.warnings.is_empty() {
        warn!(%id, warnings = %response.warning_text(), "warnings");
    }
    if !response.errors.is_empty() {
        error!(%id, errors = %response.error_text(), "errors");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pipeline::Fixer;
    use crate::record::Field;
    use crate::testing::{MemoryClient, MemoryRepository, StripOneValidator, id, record_with_dupes};

    fn cat(who: &str) -> Field {
        Field::data("CAT", " ", " ", &[("a", who)])
    }

    fn store(client: &Arc<MemoryClient>) -> BackupStore<MemoryClient, MemoryRepository> {
        BackupStore::new(Arc::clone(client), Arc::new(MemoryRepository::default()))
    }

    fn fixer(client: &Arc<MemoryClient>) -> Fixer<MemoryClient, StripOneValidator> {
        Fixer::new(Arc::clone(client), Arc::new(StripOneValidator::new("999")))
    }

    #[test]
    fn projection_carries_only_the_last_cataloging_field() {
        let original = record_with_dupes("1", 0).with_field(cat("FIRST"));
        let current = record_with_dupes("1", 0)
            .with_field(Field::data("500", " ", " ", &[("a", "Edited")]))
            .with_field(cat("FIRST"))
            .with_field(cat("LOAD-FIX"));

        let restored = rollback_projection(original.clone(), &current);
        assert_eq!(restored, original.with_field(cat("LOAD-FIX")));
        assert_eq!(restored.get("500").count(), 0);
    }

    #[test]
    fn projection_without_cataloging_field_is_the_original() {
        let original = record_with_dupes("1", 2);
        let restored = rollback_projection(original.clone(), &record_with_dupes("1", 0));
        assert_eq!(restored, original);
    }

    #[tokio::test]
    async fn fix_then_revert_restores_the_original() {
        let original = record_with_dupes("42", 2).with_field(cat("IMPORT"));
        let client = Arc::new(MemoryClient::with_records([original.clone()]));
        let store = store(&client);
        let batch = BatchId::new("batch-1").unwrap();

        let result = fixer(&client).fix_one("42").await.unwrap();
        assert!(result.changed());
        store.save(&batch, &[result]).await.unwrap();

        // Someone catalogs the fixed record afterwards.
        let mut live = client.get(&id("42")).unwrap();
        live.append_field(cat("LOAD-FIX"));
        client.put(live);

        assert!(store.revert_single(&id("42")).await.unwrap());

        let (restored, options) = client.updates.lock().unwrap().last().cloned().unwrap();
        assert_eq!(restored, original.with_field(cat("LOAD-FIX")));
        assert!(!options.bypass_low_validation);
    }

    #[tokio::test]
    async fn revert_single_uses_the_newest_batch() {
        let client = Arc::new(MemoryClient::with_records([record_with_dupes("5", 0)]));
        let store = store(&client);

        for (batch, dupes) in [("batch-20180101", 1), ("batch-20180301", 3), ("batch-20180201", 2)] {
            let original = record_with_dupes("5", dupes);
            let result = FixResult {
                id: id("5"),
                original_record: original.clone(),
                validated_record: record_with_dupes("5", 0),
                report: Default::default(),
                revalidated: true,
                update_response: None,
            };
            store.save(&BatchId::new(batch).unwrap(), &[result]).await.unwrap();
        }

        assert!(store.revert_single(&id("5")).await.unwrap());
        assert_eq!(client.get(&id("5")).unwrap(), record_with_dupes("5", 3));
    }

    #[tokio::test]
    async fn revert_single_without_backup_is_false() {
        let client = Arc::new(MemoryClient::with_records([record_with_dupes("5", 0)]));
        assert!(!store(&client).revert_single(&id("5")).await.unwrap());
        assert_eq!(client.update_count(), 0);
    }

    #[tokio::test]
    async fn revert_batch_continues_past_failures() {
        let client = Arc::new(MemoryClient::with_records(
            ["1", "2", "3"].map(|r| record_with_dupes(r, 2)),
        ));
        let store = store(&client);
        let fixer = fixer(&client);
        let batch = BatchId::new("batch-2").unwrap();

        let mut results = Vec::new();
        for r in ["1", "2", "3"] {
            results.push(fixer.fix_one(r).await.unwrap());
        }
        assert_eq!(store.save(&batch, &results).await.unwrap().inserted_count(), 3);

        client.fail_on(id("2"));
        let outcomes = store.revert_batch(&batch).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).map(|o| o.id).collect();
        assert_eq!(failed, vec![id("2")]);
        assert!(matches!(outcomes[1].status, RevertStatus::Failed(_)));
        assert_eq!(client.get(&id("1")).unwrap(), record_with_dupes("1", 2));
        assert_eq!(client.get(&id("3")).unwrap(), record_with_dupes("3", 2));
    }

    #[tokio::test]
    async fn revert_of_unknown_batch_is_empty() {
        let client = Arc::new(MemoryClient::default());
        let outcomes = store(&client)
            .revert_batch(&BatchId::new("nope").unwrap())
            .await
            .unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn save_rejects_duplicate_ids_in_a_batch() {
        let client = Arc::new(MemoryClient::with_records([record_with_dupes("8", 1)]));
        let store = store(&client);
        let batch = BatchId::new("batch-3").unwrap();
        let result = fixer(&client).fix_one("8").await.unwrap();

        store.save(&batch, &[result.clone()]).await.unwrap();
        let err = store.save(&batch, &[result]).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[tokio::test]
    async fn wipe_honours_confirmation() {
        let client = Arc::new(MemoryClient::with_records([record_with_dupes("8", 1)]));
        let store = store(&client);
        let repository = store.repository().as_ref();

        assert_eq!(
            wipe(repository, |_| panic!("asked to confirm an empty store"))
                .await
                .unwrap(),
            WipeOutcome::Empty
        );

        let result = fixer(&client).fix_one("8").await.unwrap();
        store.save(&BatchId::new("batch-4").unwrap(), &[result]).await.unwrap();

        assert_eq!(wipe(repository, |_| false).await.unwrap(), WipeOutcome::Declined);
        assert_eq!(repository.stats().await.unwrap().records, 1);

        let mut seen = None;
        let outcome = wipe(repository, |stats| {
            seen = Some(*stats);
            true
        })
        .await
        .unwrap();
        let expected = StoreStats {
            records: 1,
            collections: 1,
        };
        assert_eq!(outcome, WipeOutcome::Wiped(expected));
        assert_eq!(seen, Some(expected));
        assert!(repository.stats().await.unwrap().is_empty());
    }
}
