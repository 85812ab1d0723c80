//! Fix command implementation.

use anyhow::{Context, Result};
use clap::Args;

use marcfix_core::BatchId;

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Record id
    pub id: String,
}

pub async fn run(args: FixArgs, globals: &GlobalArgs) -> Result<()> {
    let client = config::connect_authenticated(globals)?;
    let store = config::backup_store(globals, client.clone())?;
    let fixer = config::fixer(client);

    let result = fixer
        .fix_one(&args.id)
        .await
        .with_context(|| format!("Failed to fix record {}", args.id))?;

    output::report(&result.report);
    match &result.update_response {
        Some(response) => output::response(response),
        None => output::success(&format!("Record {} needs no changes", result.id)),
    }

    let batch_id = BatchId::generate();
    store
        .save(&batch_id, std::slice::from_ref(&result))
        .await
        .context("Failed to save backup")?;
    output::field("Batch", batch_id.as_str());

    Ok(())
}
