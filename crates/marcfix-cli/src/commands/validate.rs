//! Validate command implementation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Record id
    pub id: String,

    /// Also write the original and validated records to this directory
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

pub async fn run(args: ValidateArgs, globals: &GlobalArgs) -> Result<()> {
    let fixer = config::fixer(config::connect_authenticated(globals)?);

    let outcome = fixer
        .validate_record(&args.id)
        .await
        .with_context(|| format!("Failed to validate record {}", args.id))?;

    output::report(&outcome.report);

    if outcome.original_record == outcome.validated_record {
        output::success(&format!("Record {} needs no changes", outcome.id));
    } else {
        output::field("Validated record", "");
        println!("{}", outcome.validated_record);
    }

    if let Some(dir) = &args.save_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let validated = dir.join(format!("{}_validated.json", outcome.id));
        let original = dir.join(format!("{}_original.json", outcome.id));
        fs::write(&validated, serde_json::to_string_pretty(&outcome.validated_record)?)
            .with_context(|| format!("Failed to write {}", validated.display()))?;
        fs::write(&original, serde_json::to_string_pretty(&outcome.original_record)?)
            .with_context(|| format!("Failed to write {}", original.display()))?;

        output::success(&format!("Saved {} and {}", validated.display(), original.display()));
    }

    Ok(())
}
