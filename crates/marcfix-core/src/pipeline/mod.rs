//! The fix pipeline.
//!
//! [`Fixer`] handles a single record; [`BatchRunner`] drives lists of ids
//! through it chunk by chunk, gated by a [`TimeWindowGate`], and persists
//! each chunk's results to the backup store.

mod batch;
mod chunk;
mod diff;
mod fix;
mod window;

pub use batch::{
    BatchConfig, BatchFailure, BatchRunner, BatchSummary, ChunkReport, DEFAULT_BACKOFF,
    DEFAULT_CHUNK_SIZE,
};
pub use chunk::{ChunkScheduler, Progress, partition};
pub use diff::{RecordDiff, RecordDiffGuard};
pub use fix::Fixer;
pub use window::{Clock, LocalClock, TimeWindowGate, is_open};
