//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{
    fix::FixArgs, fix_file::FixFileArgs, fix_multiple::FixMultipleArgs, reset::ResetArgs,
    show::ShowArgs, undo::UndoArgs, undo_batch::UndoBatchArgs, validate::ValidateArgs,
};

/// Validate, repair and roll back catalog records.
#[derive(Parser, Debug)]
#[command(name = "marcfix")]
#[command(author, version = env!("MARCFIX_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and storage settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Record API endpoint (https://..., http://localhost..., or file:///path)
    #[arg(long, env = "MARCFIX_API", global = true)]
    pub api: Option<String>,

    /// Record API username
    #[arg(long, env = "MARCFIX_API_USERNAME", global = true)]
    pub username: Option<String>,

    /// Record API password
    #[arg(long, env = "MARCFIX_API_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Backup store directory (defaults to the platform data directory)
    #[arg(long, env = "MARCFIX_BACKUP_DIR", global = true)]
    pub backup_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a record
    Show(ShowArgs),

    /// Validate a record without updating it
    Validate(ValidateArgs),

    /// Validate a record and submit the fixed version
    Fix(FixArgs),

    /// Validate records from a local JSON file
    FixFile(FixFileArgs),

    /// Fix every record listed in an ids file, in chunks
    FixMultiple(FixMultipleArgs),

    /// Restore a record from its most recent backup
    Undo(UndoArgs),

    /// Restore every record of a batch run
    UndoBatch(UndoBatchArgs),

    /// Delete all backups
    Reset(ResetArgs),
}
