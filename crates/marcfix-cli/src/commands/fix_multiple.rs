//! Fix-multiple command implementation.

use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use tokio::sync::watch;
use tracing::warn;

use marcfix_core::{BatchConfig, BatchRunner, RecordId, TimeWindow};

use crate::cli::GlobalArgs;
use crate::{config, output};

#[derive(Args, Debug)]
pub struct FixMultipleArgs {
    /// File with one record id per line
    pub file: PathBuf,

    /// Records processed concurrently per chunk
    #[arg(long, default_value = "5")]
    pub chunk_size: NonZeroUsize,

    /// Only process on weekdays between these hours, e.g. 17-06
    #[arg(long, value_name = "HH-HH")]
    pub time_window: Option<TimeWindow>,
}

/// Parse an ids file: one id per line, blank and invalid lines skipped.
fn parse_ids(content: &str) -> Vec<RecordId> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match RecordId::new(line) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(line, error = %err, "skipping invalid id");
                None
            }
        })
        .collect()
}

pub async fn run(args: FixMultipleArgs, globals: &GlobalArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read ids file {}", args.file.display()))?;
    let ids = parse_ids(&content);
    if ids.is_empty() {
        bail!("No valid record ids in {}", args.file.display());
    }

    let client = config::connect_authenticated(globals)?;
    let store = config::backup_store(globals, client.clone())?;
    let fixer = config::fixer(client);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after the current chunk");
            let _ = shutdown_tx.send(true);
        }
    });

    let batch_config = BatchConfig {
        chunk_size: args.chunk_size,
        window: args.time_window,
        ..Default::default()
    };
    let runner = BatchRunner::new(fixer, store, batch_config).with_shutdown(shutdown_rx);

    let summary = runner.run(&ids).await.context("Batch run failed")?;
    output::batch_summary(&summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ids_skips_junk() {
        let ids = parse_ids("  12 \n\nabc\n000000034\n0\n100000000\n12\n");
        let values: Vec<_> = ids.iter().map(RecordId::value).collect();
        assert_eq!(values, vec![12, 34, 12]);
    }

    #[test]
    fn parse_ids_of_empty_file() {
        assert!(parse_ids("\n \n").is_empty());
    }
}
