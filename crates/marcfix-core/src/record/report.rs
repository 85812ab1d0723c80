//! Validation report types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Field;

/// The outcome of one validation pass: one entry per validator, in the
/// order the validators ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Per-validator reports.
    pub validators: Vec<ValidatorReport>,
}

/// Findings from a single validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorReport {
    /// Validator name.
    pub name: String,
    /// Findings, in the order they were produced.
    #[serde(default)]
    pub findings: Vec<Finding>,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Severity of the finding.
    #[serde(rename = "type")]
    pub kind: FindingKind,
    /// Human-readable description.
    pub message: String,
    /// The field-level fix applied for this finding, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<FieldFix>,
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// The record violates a rule.
    Error,
    /// The record looks suspicious.
    Warning,
    /// Informational.
    Info,
}

/// A description of a field-level change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFix {
    /// What happened to the field (e.g. "removed").
    #[serde(rename = "type")]
    pub kind: String,
    /// The affected field.
    pub field: Field,
}

impl ValidationReport {
    /// Append a validator report.
    pub fn push(&mut self, report: ValidatorReport) {
        self.validators.push(report);
    }

    /// Returns true if no validator produced a finding.
    pub fn is_clean(&self) -> bool {
        self.validators.iter().all(|v| v.findings.is_empty())
    }

    /// Returns true if any finding is an error.
    pub fn failed(&self) -> bool {
        self.validators
            .iter()
            .flat_map(|v| &v.findings)
            .any(|f| f.kind == FindingKind::Error)
    }

    /// Total number of findings across all validators.
    pub fn finding_count(&self) -> usize {
        self.validators.iter().map(|v| v.findings.len()).sum()
    }
}

impl ValidatorReport {
    /// Create an empty report for a validator.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            findings: Vec::new(),
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FindingKind::Error => "error",
            FindingKind::Warning => "warning",
            FindingKind::Info => "info",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator reports:")?;
        for validator in self.validators.iter().filter(|v| !v.findings.is_empty()) {
            write!(f, "\n=======================\n{}:", validator.name.trim())?;
            for finding in &validator.findings {
                write!(f, "\n{}: {}", finding.kind, finding.message)?;
                if let Some(fix) = &finding.fix {
                    write!(f, "\n{}: {}", fix.kind, fix.field)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ValidationReport {
        let mut dupes = ValidatorReport::new("IdenticalFields");
        dupes.findings.push(Finding {
            kind: FindingKind::Warning,
            message: "Identical field 500 removed".to_string(),
            fix: Some(FieldFix {
                kind: "removed".to_string(),
                field: Field::data("500", " ", " ", &[("a", "Note")]),
            }),
        });

        ValidationReport {
            validators: vec![ValidatorReport::new("Quiet"), dupes],
        }
    }

    #[test]
    fn renders_only_validators_with_findings() {
        let text = report().to_string();
        assert_eq!(
            text,
            "Validator reports:\n=======================\nIdenticalFields:\n\
             warning: Identical field 500 removed\nremoved: 500    ‡aNote"
        );
    }

    #[test]
    fn counts_and_flags() {
        let report = report();
        assert!(!report.is_clean());
        assert!(!report.failed());
        assert_eq!(report.finding_count(), 1);
        assert!(ValidationReport::default().is_clean());
    }

    #[test]
    fn kind_serializes_as_type() {
        let json = serde_json::to_value(&report()).unwrap();
        assert_eq!(json["validators"][1]["findings"][0]["type"], "warning");
    }
}
