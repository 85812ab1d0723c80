//! Undo-batch command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use marcfix_core::{BatchId, RevertStatus};

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct UndoBatchArgs {
    /// Batch id printed by fix or fix-multiple
    pub batch: String,
}

pub async fn run(args: UndoBatchArgs, globals: &GlobalArgs) -> Result<()> {
    let batch = BatchId::new(&args.batch)?;
    let client = config::connect(globals)?;
    let store = config::backup_store(globals, client)?;

    let outcomes = store
        .revert_batch(&batch)
        .await
        .with_context(|| format!("Failed to revert batch {}", batch))?;

    if outcomes.is_empty() {
        bail!("No backups found for batch {}", batch);
    }

    for outcome in &outcomes {
        match &outcome.status {
            RevertStatus::Reverted(_) => output::success(&format!("{} restored", outcome.id)),
            RevertStatus::RevertedWithWarnings(response) => {
                output::warning(&format!("{} restored: {}", outcome.id, response.warning_text()))
            }
            RevertStatus::Rejected(response) => {
                output::error(&format!("{} rejected: {}", outcome.id, response.error_text()))
            }
            RevertStatus::Failed(reason) => {
                output::error(&format!("{} failed: {}", outcome.id, reason))
            }
        }
    }

    let restored = outcomes.iter().filter(|o| o.is_success()).count();
    output::field("Restored", &format!("{}/{}", restored, outcomes.len()));

    Ok(())
}
