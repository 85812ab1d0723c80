//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use marcfix_core::{BatchSummary, UpdateResponse, ValidationReport};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a validation report.
pub fn report(report: &ValidationReport) {
    println!("{}", report);
}

/// Print the non-empty parts of an API response.
pub fn response(response: &UpdateResponse) {
    if !response.messages.is_empty() {
        field("Messages", &response.message_text());
    }
    if !response.triggers.is_empty() {
        field("Triggers", &response.trigger_text());
    }
    if !response.warnings.is_empty() {
        warning(&response.warning_text());
    }
    if !response.errors.is_empty() {
        error(&response.error_text());
    }
}

/// Print the result of a batch run.
pub fn batch_summary(summary: &BatchSummary) {
    field("Batch", summary.batch_id.as_str());
    field(
        "Attempted",
        &format!("{}/{}", summary.attempted, summary.total),
    );
    field("Updated", &summary.updated.to_string());
    field("Persisted", &summary.persisted.to_string());

    for failure in &summary.failures {
        error(&format!("{}: {}", failure.id, failure.error));
    }

    if summary.interrupted {
        warning("Interrupted before all records were processed");
    } else if summary.failures.is_empty() {
        success(&format!("{} records processed", summary.attempted));
    } else {
        warning(&format!(
            "{} records processed, {} failed",
            summary.attempted,
            summary.failures.len()
        ));
    }
}
