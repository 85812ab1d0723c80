//! Fix-file command implementation.
//!
//! Runs the rule chain over a local records file. The record API is
//! never contacted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use marcfix_core::{RecordDiffGuard, Validator, ValidatorChain};

use crate::output;

#[derive(Args, Debug)]
pub struct FixFileArgs {
    /// Records file (.jsonl or .json)
    pub file: PathBuf,

    /// Directory for the validated output
    #[arg(long, default_value = "files")]
    pub output_dir: PathBuf,
}

pub async fn run(args: FixFileArgs) -> Result<()> {
    let records = marcfix_file::read_records(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let chain = ValidatorChain::with_default_rules(true);
    let mut validated = Vec::with_capacity(records.len());
    let mut changed = 0;

    for original in records {
        let mut record = original.clone();
        let mut report = chain.validate(&mut record).await?;
        if RecordDiffGuard::decide(&original, &record).needs_revalidation() {
            changed += 1;
            report = chain.validate(&mut record).await?;
        }
        info!(
            id = record.control_number().unwrap_or("-"),
            findings = report.finding_count(),
            "record validated"
        );
        validated.push(record);
    }

    let stem = args
        .file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Input file has no name")?;
    let out = args.output_dir.join(format!("{stem}_validated.jsonl"));
    marcfix_file::write_records(&out, &validated)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    output::field("Output", &out.display().to_string());
    output::success(&format!(
        "{} records processed, {} changed",
        validated.len(),
        changed
    ));

    Ok(())
}
