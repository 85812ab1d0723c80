//! marcfix-file - Filesystem implementations of the marcfix collaborators.
//!
//! [`FileBackupRepository`] keeps one directory per batch and one JSON
//! document per record. [`FileRecordClient`] serves records from a local
//! directory and is selected with a `file://` API URL.

mod client;
mod records_file;
mod repository;
mod store;

pub use client::FileRecordClient;
pub use records_file::{RecordFileFormat, read_records, write_records};
pub use repository::FileBackupRepository;
