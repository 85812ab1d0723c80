//! Change detection between record snapshots.

use crate::record::Record;

/// Decides whether a validator changed a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDiffGuard;

/// The result of comparing two record snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDiff {
    /// Whether the snapshots differ.
    pub changed: bool,
}

impl RecordDiffGuard {
    /// Compare two snapshots by full, order-sensitive structural equality.
    pub fn decide(original: &Record, candidate: &Record) -> RecordDiff {
        RecordDiff {
            changed: original != candidate,
        }
    }
}

impl RecordDiff {
    /// A change after the first pass warrants one more validation pass.
    pub fn needs_revalidation(&self) -> bool {
        self.changed
    }

    /// A change after validation warrants an update call.
    pub fn needs_update(&self) -> bool {
        self.changed
    }
}
