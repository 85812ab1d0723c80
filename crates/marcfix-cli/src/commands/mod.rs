//! Subcommand implementations.

pub mod fix;
pub mod fix_file;
pub mod fix_multiple;
pub mod reset;
pub mod show;
pub mod undo;
pub mod undo_batch;
pub mod validate;
