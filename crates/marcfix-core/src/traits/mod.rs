//! Collaborator traits.
//!
//! The pipeline talks to the record API, the rule engine and the backup
//! store only through these traits, so each can be swapped for a fake.

mod client;
mod repository;
mod validator;

pub use client::RecordClient;
pub use repository::{BackupRepository, StoreStats};
pub use validator::Validator;
