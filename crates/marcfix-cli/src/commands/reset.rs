//! Reset command implementation.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;

use marcfix_core::{WipeOutcome, wipe};

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

fn confirm(records: usize, collections: usize) -> bool {
    eprint!(
        "This will delete {} backups in {} batches. Continue? [y/N] ",
        records, collections
    );
    if io::stderr().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("y")
}

pub async fn run(args: ResetArgs, globals: &GlobalArgs) -> Result<()> {
    let repository = config::backup_repository(globals)?;

    let outcome = wipe(&repository, |stats| {
        args.force || confirm(stats.records, stats.collections)
    })
    .await
    .context("Failed to wipe backups")?;

    match outcome {
        WipeOutcome::Empty => output::success("No backups to delete"),
        WipeOutcome::Declined => eprintln!("Aborted."),
        WipeOutcome::Wiped(stats) => output::success(&format!(
            "Deleted {} backups in {} batches",
            stats.records, stats.collections
        )),
    }

    Ok(())
}
