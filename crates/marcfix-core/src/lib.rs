//! marcfix-core - Core types, traits and the batch fix-and-rollback pipeline.
//!
//! The pipeline fetches bibliographic records through a [`RecordClient`],
//! runs them through a [`Validator`], submits changed records back, and
//! keeps a before/after snapshot of every change in a [`BackupStore`] so
//! any record or whole batch can be rolled back.

pub mod backup;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod rules;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use backup::{BackupStore, RevertOutcome, RevertStatus, SaveReceipt, WipeOutcome, wipe};
pub use error::Error;
pub use pipeline::{
    BatchConfig, BatchRunner, BatchSummary, ChunkScheduler, Clock, Fixer, LocalClock,
    RecordDiffGuard, TimeWindowGate,
};
pub use record::{
    BackupEntry, Field, FixResult, Record, Subfield, UpdateOptions, UpdateResponse,
    ValidationOutcome, ValidationReport,
};
pub use rules::{FixRule, IdenticalFields, ValidatorChain};
pub use traits::{BackupRepository, RecordClient, StoreStats, Validator};
pub use types::{ApiUrl, BatchId, RecordId, TimeWindow};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
