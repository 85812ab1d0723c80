//! In-memory fakes shared by the unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::Result;
use crate::error::{ClientError, StoreError, ValidatorError};
use crate::record::{
    ApiMessage, BackupEntry, Field, FieldFix, Finding, FindingKind, Record, UpdateOptions,
    UpdateResponse, ValidationReport, ValidatorReport,
};
use crate::traits::{BackupRepository, RecordClient, StoreStats, Validator};
use crate::types::{BatchId, RecordId};

pub(crate) fn id(s: &str) -> RecordId {
    RecordId::new(s).unwrap()
}

/// A record with the given id and `dupes` copies of a 999 note field.
pub(crate) fn record_with_dupes(id: &str, dupes: usize) -> Record {
    let mut record = Record::new("00000cam^a2200000^i^4500")
        .with_field(Field::control("001", RecordId::new(id).unwrap().padded()))
        .with_field(Field::data("245", "1", "0", &[("a", "Title")]));
    for _ in 0..dupes {
        record.append_field(Field::data("999", " ", " ", &[("a", "Junk")]));
    }
    record
}

#[derive(Default)]
pub(crate) struct MemoryClient {
    records: Mutex<HashMap<RecordId, Record>>,
    failing: Mutex<HashSet<RecordId>>,
    pub updates: Mutex<Vec<(Record, UpdateOptions)>>,
    pub loads: AtomicUsize,
}

impl MemoryClient {
    pub(crate) fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let client = Self::default();
        for record in records {
            client.put(record);
        }
        client
    }

    pub(crate) fn put(&self, record: Record) {
        let id = record.id().unwrap();
        self.records.lock().unwrap().insert(id, record);
    }

    pub(crate) fn get(&self, id: &RecordId) -> Option<Record> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub(crate) fn fail_on(&self, id: RecordId) {
        self.failing.lock().unwrap().insert(id);
    }

    pub(crate) fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordClient for MemoryClient {
    async fn load_record(&self, id: &RecordId) -> Result<Option<Record>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(id) {
            return Err(ClientError::Connection {
                message: "connection reset".to_string(),
            }
            .into());
        }
        Ok(self.get(id))
    }

    async fn update_record(
        &self,
        record: &Record,
        options: &UpdateOptions,
    ) -> Result<UpdateResponse> {
        let id = record.id()?;
        self.updates
            .lock()
            .unwrap()
            .push((record.clone(), *options));
        self.put(record.clone());
        Ok(UpdateResponse {
            messages: vec![ApiMessage::new(format!("Record {} updated", id))],
            ..Default::default()
        })
    }
}

/// Removes one field with the given tag per pass.
pub(crate) struct StripOneValidator {
    tag: String,
    fail_on: Option<RecordId>,
    pub passes: AtomicUsize,
}

impl StripOneValidator {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            fail_on: None,
            passes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing_on(mut self, id: RecordId) -> Self {
        self.fail_on = Some(id);
        self
    }

    pub(crate) fn pass_count(&self) -> usize {
        self.passes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Validator for StripOneValidator {
    async fn validate(&self, record: &mut Record) -> Result<ValidationReport> {
        self.passes.fetch_add(1, Ordering::SeqCst);

        if self.fail_on.is_some() && record.id().ok() == self.fail_on {
            return Err(ValidatorError::Rule {
                rule: "strip".to_string(),
                message: "rule crashed".to_string(),
            }
            .into());
        }

        let mut report = ValidatorReport::new("strip");
        if let Some(pos) = record.fields.iter().position(|f| f.tag() == self.tag) {
            let field = record.fields.remove(pos);
            report.findings.push(Finding {
                kind: FindingKind::Warning,
                message: format!("Removed field {}", self.tag),
                fix: Some(FieldFix {
                    kind: "removed".to_string(),
                    field,
                }),
            });
        }

        Ok(ValidationReport {
            validators: vec![report],
        })
    }
}

#[derive(Default)]
pub(crate) struct MemoryRepository {
    batches: Mutex<BTreeMap<BatchId, BTreeMap<RecordId, BackupEntry>>>,
    fail_inserts: Mutex<bool>,
    pub insert_calls: AtomicUsize,
}

impl MemoryRepository {
    pub(crate) fn fail_inserts(&self) {
        *self.fail_inserts.lock().unwrap() = true;
    }

    pub(crate) fn batch_len(&self, batch: &BatchId) -> usize {
        self.batches
            .lock()
            .unwrap()
            .get(batch)
            .map_or(0, |entries| entries.len())
    }
}

#[async_trait]
impl BackupRepository for MemoryRepository {
    async fn insert_many(&self, batch: &BatchId, entries: &[BackupEntry]) -> Result<Vec<RecordId>> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_inserts.lock().unwrap() {
            return Err(StoreError::Io {
                message: "disk full".to_string(),
            }
            .into());
        }

        let mut batches = self.batches.lock().unwrap();
        let collection = batches.entry(batch.clone()).or_default();
        let mut ids = Vec::new();
        for entry in entries {
            if collection.contains_key(&entry.id) {
                return Err(StoreError::DuplicateEntry {
                    batch: batch.to_string(),
                    id: entry.id,
                }
                .into());
            }
            collection.insert(entry.id, entry.clone());
            ids.push(entry.id);
        }
        Ok(ids)
    }

    async fn find_batch(&self, batch: &BatchId) -> Result<Vec<BackupEntry>> {
        Ok(self
            .batches
            .lock()
            .unwrap()
            .get(batch)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_entry(&self, batch: &BatchId, id: &RecordId) -> Result<Option<BackupEntry>> {
        Ok(self
            .batches
            .lock()
            .unwrap()
            .get(batch)
            .and_then(|entries| entries.get(id).cloned()))
    }

    async fn list_batches(&self) -> Result<Vec<BatchId>> {
        Ok(self.batches.lock().unwrap().keys().cloned().collect())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let batches = self.batches.lock().unwrap();
        Ok(StoreStats {
            records: batches.values().map(|entries| entries.len()).sum(),
            collections: batches.len(),
        })
    }

    async fn drop_all(&self) -> Result<()> {
        self.batches.lock().unwrap().clear();
        Ok(())
    }
}
