//! Chunked, time-gated batch runs.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use super::chunk::ChunkScheduler;
use super::fix::Fixer;
use super::window::{Clock, LocalClock, TimeWindowGate};
use crate::Result;
use crate::backup::BackupStore;
use crate::record::FixResult;
use crate::traits::{BackupRepository, RecordClient, Validator};
use crate::types::{BatchId, RecordId, TimeWindow};

/// Default number of records processed concurrently.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(5).unwrap();

/// Default pause before re-checking a closed time window.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(20 * 60);

/// Tuning for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Records per chunk; also the concurrency bound.
    pub chunk_size: NonZeroUsize,
    /// Allowed processing hours, if any.
    pub window: Option<TimeWindow>,
    /// How long to wait before re-checking a closed window.
    pub backoff: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            window: None,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

/// A record that failed during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The record id.
    pub id: RecordId,
    /// The rendered error.
    pub error: String,
}

/// What happened to one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkReport {
    /// Zero-based chunk index.
    pub index: usize,
    /// Number of ids in the chunk.
    pub size: usize,
    /// Ids that were fixed without error.
    pub succeeded: usize,
    /// Entries written to the backup store.
    pub persisted: usize,
    /// Records attempted so far, this chunk included.
    pub done: usize,
}

/// The result of a batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Backup collection the run wrote to.
    pub batch_id: BatchId,
    /// Distinct ids in the run.
    pub total: usize,
    /// Ids that were attempted, failures included.
    pub attempted: usize,
    /// Ids fixed without error.
    pub succeeded: usize,
    /// Ids whose record was changed and submitted.
    pub updated: usize,
    /// Entries written to the backup store.
    pub persisted: usize,
    /// Per-id failures, in the order they were seen.
    pub failures: Vec<BatchFailure>,
    /// Per-chunk accounting.
    pub chunks: Vec<ChunkReport>,
    /// Whether the run stopped early on a shutdown request.
    pub interrupted: bool,
}

impl BatchSummary {
    fn new(batch_id: BatchId, total: usize) -> Self {
        Self {
            batch_id,
            total,
            attempted: 0,
            succeeded: 0,
            updated: 0,
            persisted: 0,
            failures: Vec::new(),
            chunks: Vec::new(),
            interrupted: false,
        }
    }

    /// Returns true if every id was attempted.
    pub fn is_complete(&self) -> bool {
        self.attempted == self.total
    }
}

/// Drives a list of ids through the fixer chunk by chunk.
///
/// Chunks run strictly in sequence; ids inside a chunk run concurrently.
/// The time window is consulted only between chunks, so a chunk that has
/// started always finishes and is persisted.
pub struct BatchRunner<C, V, S> {
    fixer: Fixer<C, V>,
    store: BackupStore<C, S>,
    config: BatchConfig,
    clock: Arc<dyn Clock>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<C, V, S> BatchRunner<C, V, S>
where
    C: RecordClient,
    V: Validator,
    S: BackupRepository,
{
    /// Create a runner using the local clock and no shutdown signal.
    pub fn new(fixer: Fixer<C, V>, store: BackupStore<C, S>, config: BatchConfig) -> Self {
        Self {
            fixer,
            store,
            config,
            clock: Arc::new(LocalClock),
            shutdown: None,
        }
    }

    /// Use a different clock for window checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Stop before the next chunk once `shutdown` turns true.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run the batch under a freshly generated batch id.
    pub async fn run(&self, ids: &[RecordId]) -> Result<BatchSummary> {
        self.run_with_id(BatchId::generate(), ids).await
    }

    /// Run the batch under the given batch id.
    ///
    /// Per-id failures are logged and excluded; they never abort the run.
    /// A backup store failure does abort it, leaving earlier chunks stored.
    #[instrument(skip(self, ids), fields(batch = %batch_id, ids = ids.len()))]
    pub async fn run_with_id(&self, batch_id: BatchId, ids: &[RecordId]) -> Result<BatchSummary> {
        let ids = dedupe(ids);
        let gate = TimeWindowGate::new(self.config.window);
        let mut shutdown = self.shutdown.clone();
        let mut scheduler = ChunkScheduler::new(ids, self.config.chunk_size);
        let mut summary = BatchSummary::new(batch_id, scheduler.total());

        info!(total = summary.total, chunk_size = self.config.chunk_size.get(), "starting batch");

        while !scheduler.is_exhausted() {
            if !self.wait_for_window(&gate, &mut shutdown).await {
                warn!(progress = %scheduler.progress(), "shutdown requested, stopping batch");
                summary.interrupted = true;
                break;
            }

            let Some(chunk) = scheduler.next_chunk() else {
                break;
            };

            let outcomes = join_all(chunk.iter().map(|id| self.fixer.fix_id(*id))).await;

            let mut results: Vec<FixResult> = Vec::with_capacity(chunk.len());
            for (id, outcome) in chunk.iter().zip(outcomes) {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(err) => {
                        error!(%id, error = %err, "failed to fix record");
                        summary.failures.push(BatchFailure {
                            id: *id,
                            error: err.to_string(),
                        });
                    }
                }
            }

            let persisted = if results.is_empty() {
                0
            } else {
                self.store
                    .save(&summary.batch_id, &results)
                    .await?
                    .inserted_count()
            };

            let progress = scheduler.complete(chunk.len());
            summary.attempted = progress.done;
            summary.succeeded += results.len();
            summary.updated += results.iter().filter(|r| r.updated()).count();
            summary.persisted += persisted;
            summary.chunks.push(ChunkReport {
                index: summary.chunks.len(),
                size: chunk.len(),
                succeeded: results.len(),
                persisted,
                done: progress.done,
            });

            info!("{progress} records processed.");
        }

        info!(
            attempted = summary.attempted,
            persisted = summary.persisted,
            failed = summary.failures.len(),
            "batch finished"
        );

        Ok(summary)
    }

    /// Wait until the window is open. Returns false on shutdown.
    async fn wait_for_window(
        &self,
        gate: &TimeWindowGate,
        shutdown: &mut Option<watch::Receiver<bool>>,
    ) -> bool {
        loop {
            if shutdown.as_ref().is_some_and(|rx| *rx.borrow()) {
                return false;
            }

            let now = self.clock.now();
            if gate.is_open(now) {
                return true;
            }

            info!(
                %now,
                window = ?gate.window().map(ToString::to_string),
                backoff_secs = self.config.backoff.as_secs(),
                "outside processing window, waiting"
            );

            let sleep = tokio::time::sleep(self.config.backoff);
            let stopped = match shutdown.as_mut() {
                Some(rx) => tokio::select! {
                    _ = sleep => None,
                    changed = rx.wait_for(|stop| *stop) => Some(changed.is_ok()),
                },
                None => {
                    sleep.await;
                    None
                }
            };

            match stopped {
                Some(true) => return false,
                // Sender gone: nobody can ask us to stop any more.
                Some(false) => *shutdown = None,
                None => {}
            }
        }
    }
}

/// Drop repeated ids, keeping the first occurrence.
fn dedupe(ids: &[RecordId]) -> Vec<RecordId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
