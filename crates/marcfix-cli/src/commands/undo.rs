//! Undo command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use marcfix_core::RecordId;

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct UndoArgs {
    /// Record id
    pub id: String,
}

pub async fn run(args: UndoArgs, globals: &GlobalArgs) -> Result<()> {
    let id = RecordId::new(&args.id)?;
    let client = config::connect(globals)?;
    let store = config::backup_store(globals, client)?;

    let reverted = store
        .revert_single(&id)
        .await
        .context("Failed to read backups")?;

    if !reverted {
        bail!("Record {} was not restored (no backup, or the API rejected it)", id);
    }

    output::success(&format!("Record {} restored", id));
    Ok(())
}
