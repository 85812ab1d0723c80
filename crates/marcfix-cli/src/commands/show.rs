//! Show command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id
    pub id: String,

    /// Print the record as JSON instead of MARC text
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ShowArgs, globals: &GlobalArgs) -> Result<()> {
    let fixer = config::fixer(config::connect(globals)?);

    let record = fixer
        .show(&args.id)
        .await
        .with_context(|| format!("Failed to load record {}", args.id))?;

    if args.json {
        output::json_pretty(&record)?;
    } else {
        println!("{}", record);
    }

    Ok(())
}
